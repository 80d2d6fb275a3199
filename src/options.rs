//! Resolution options and their defaults.
//!
//! Options come from three places, later ones winning:
//! 1. Built-in defaults (plus `CONFSTACK_*` environment variables)
//! 2. The `ResolveOptions` value passed by the caller
//! 3. A `_resolver` table embedded in the base config file

use crate::merge::MergeStrategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the active environment.
pub const ENV_VAR: &str = "CONFSTACK_ENV";

/// Environment variable overriding the base config path.
pub const CONFIG_PATH_VAR: &str = "CONFSTACK_CONFIG_PATH";

/// Key under which a base file may embed resolver options.
pub const OPTIONS_KEY: &str = "_resolver";

/// Which kind of pending key the resolution loop drains first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPriority {
    /// Drain environment overlays before touching imports (default).
    #[default]
    Environment,
    /// Drain imports (including nested ones) before environment overlays.
    Import,
}

impl std::fmt::Display for LoadPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadPriority::Environment => write!(f, "environment"),
            LoadPriority::Import => write!(f, "import"),
        }
    }
}

/// Options driving a single resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Base config path. Probed against the search roots, with extension
    /// probing when no recognized extension is present.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Active environment name. `None` means no environment overlay applies.
    #[serde(default = "default_env")]
    pub env: Option<String>,

    /// Key holding the per-environment overlay table.
    #[serde(default = "default_environments_key")]
    pub environments_key: String,

    /// Key holding the imports entry (string or array of strings).
    #[serde(default = "default_imports_key")]
    pub imports_key: String,

    /// Which kind of pending key is drained first.
    #[serde(default)]
    pub priority: LoadPriority,

    /// How overlays are combined with the base document.
    #[serde(default)]
    pub merge: MergeStrategy,

    /// Store the resolved config in the process-wide publish slot.
    #[serde(default)]
    pub publish: bool,

    /// Extra directories to probe before the built-in search roots.
    #[serde(default)]
    pub search_roots: Vec<PathBuf>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            path: default_path(),
            env: default_env(),
            environments_key: default_environments_key(),
            imports_key: default_imports_key(),
            priority: LoadPriority::default(),
            merge: MergeStrategy::default(),
            publish: false,
            search_roots: Vec::new(),
        }
    }
}

fn default_path() -> PathBuf {
    std::env::var(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"))
}

fn default_env() -> Option<String> {
    std::env::var(ENV_VAR).ok().filter(|e| !e.is_empty())
}

fn default_environments_key() -> String {
    "_environments".to_string()
}

fn default_imports_key() -> String {
    "_imports".to_string()
}

impl ResolveOptions {
    /// Options pointing at an explicit base path, everything else defaulted.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl From<&str> for ResolveOptions {
    fn from(path: &str) -> Self {
        Self::with_path(path)
    }
}

impl From<String> for ResolveOptions {
    fn from(path: String) -> Self {
        Self::with_path(path)
    }
}

impl From<PathBuf> for ResolveOptions {
    fn from(path: PathBuf) -> Self {
        Self::with_path(path)
    }
}

/// Resolver options embedded in a base config file under [`OPTIONS_KEY`].
///
/// Every field is optional; present fields override the caller's options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileOptions {
    pub env: Option<String>,
    pub environments_key: Option<String>,
    pub imports_key: Option<String>,
    pub priority: Option<LoadPriority>,
    pub merge: Option<MergeStrategy>,
    pub publish: Option<bool>,
    /// Resolve and publish at startup when probed via `autoload()`.
    pub autoload: Option<bool>,
}

impl FileOptions {
    /// Overlay these file-level options onto `options`.
    pub fn apply_to(&self, options: &mut ResolveOptions) {
        if let Some(ref env) = self.env {
            options.env = Some(env.clone());
        }
        if let Some(ref key) = self.environments_key {
            options.environments_key = key.clone();
        }
        if let Some(ref key) = self.imports_key {
            options.imports_key = key.clone();
        }
        if let Some(priority) = self.priority {
            options.priority = priority;
        }
        if let Some(merge) = self.merge {
            options.merge = merge;
        }
        if let Some(publish) = self.publish {
            options.publish = publish;
        }
    }

    /// Whether this file asked to be resolved automatically at startup.
    pub fn autoload(&self) -> bool {
        self.autoload.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ResolveOptions::default();
        assert_eq!(options.environments_key, "_environments");
        assert_eq!(options.imports_key, "_imports");
        assert_eq!(options.priority, LoadPriority::Environment);
        assert_eq!(options.merge, MergeStrategy::Shallow);
        assert!(!options.publish);
    }

    #[test]
    fn test_from_str_sets_only_path() {
        let options: ResolveOptions = "settings/app".into();
        assert_eq!(options.path, PathBuf::from("settings/app"));
        assert_eq!(options.environments_key, "_environments");
    }

    #[test]
    fn test_file_options_override() {
        let mut options = ResolveOptions::default();
        let file_options = FileOptions {
            env: Some("production".to_string()),
            priority: Some(LoadPriority::Import),
            merge: Some(MergeStrategy::Deep),
            ..FileOptions::default()
        };

        file_options.apply_to(&mut options);

        assert_eq!(options.env.as_deref(), Some("production"));
        assert_eq!(options.priority, LoadPriority::Import);
        assert_eq!(options.merge, MergeStrategy::Deep);
        // Untouched fields keep their values.
        assert_eq!(options.imports_key, "_imports");
    }

    #[test]
    fn test_file_options_from_yaml() {
        let yaml = r#"
env: staging
priority: import
autoload: true
"#;
        let file_options: FileOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file_options.env.as_deref(), Some("staging"));
        assert_eq!(file_options.priority, Some(LoadPriority::Import));
        assert!(file_options.autoload());
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(LoadPriority::Environment.to_string(), "environment");
        assert_eq!(LoadPriority::Import.to_string(), "import");
    }
}

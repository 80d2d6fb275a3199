//! Config file discovery and loading.
//!
//! Paths are probed as given, then against each search root in order. When a
//! path carries no recognized extension, the probe is retried with each
//! supported extension appended. Missing files resolve to an empty mapping so
//! a partial setup degrades instead of failing.

use crate::error::{ConfigError, Result};
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions probed when a path has none, in priority order.
pub const EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Locates and loads config documents relative to a set of search roots.
#[derive(Debug, Clone)]
pub struct FileLocator {
    roots: Vec<PathBuf>,
}

impl FileLocator {
    /// Discover the default search roots: the current working directory,
    /// then the directory containing the running executable.
    pub fn discover() -> Self {
        let mut roots = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            roots.push(cwd);
        }
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            roots.push(dir.to_path_buf());
        }
        Self { roots }
    }

    /// Discover the default roots, with `extra` roots probed first.
    pub fn discover_with(extra: &[PathBuf]) -> Self {
        let mut locator = Self::discover();
        let mut roots = extra.to_vec();
        roots.append(&mut locator.roots);
        locator.roots = roots;
        locator
    }

    /// Create a locator with an explicit list of roots.
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Find a config file, returning the first existing candidate.
    ///
    /// Probes the path as given, then joined against each root. If the path
    /// has no recognized extension, the whole sequence is retried once per
    /// supported extension.
    pub fn locate(&self, path: &Path) -> Option<PathBuf> {
        if let Some(found) = self.locate_exact(path) {
            return Some(found);
        }

        if !has_known_extension(path) {
            for ext in EXTENSIONS {
                let candidate = append_extension(path, ext);
                if let Some(found) = self.locate_exact(&candidate) {
                    return Some(found);
                }
            }
        }

        None
    }

    /// Probe a single path as given, then against each root.
    fn locate_exact(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        for root in &self.roots {
            let candidate = root.join(path);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        None
    }

    /// Check whether a config file exists in any probed location.
    pub fn exists(&self, path: &Path) -> bool {
        self.locate(path).is_some()
    }

    /// Load a config document as a JSON mapping.
    ///
    /// A path that resolves to no file yields an empty mapping with a logged
    /// warning. A file that exists but cannot be read or parsed is an error.
    pub fn load(&self, path: &Path) -> Result<Value> {
        self.load_with_path(path).map(|(value, _)| value)
    }

    /// Load a config document along with the path it was found at.
    ///
    /// Locates once, so the document and the reported path come from the
    /// same probe. The path is `None` when no file was found.
    pub fn load_with_path(&self, path: &Path) -> Result<(Value, Option<PathBuf>)> {
        let Some(found) = self.locate(path) else {
            warn!(path = %path.display(), "config file not found, using empty document");
            return Ok((Value::Object(Map::new()), None));
        };

        debug!(path = %found.display(), "loading config file");
        let content =
            std::fs::read_to_string(&found).map_err(|e| ConfigError::io(&found, e))?;
        let value = parse_document(&found, &content)?;
        Ok((value, Some(found)))
    }
}

/// Parse a document by extension: `.json` via serde_json, everything else
/// via serde_yaml (which also accepts JSON).
fn parse_document(path: &Path, content: &str) -> Result<Value> {
    let value: Value = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|e| ConfigError::ParseJson {
            path: path.to_path_buf(),
            source: e,
        })?,
        _ => serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: path.to_path_buf(),
            source: e,
        })?,
    };

    match value {
        Value::Object(_) => Ok(value),
        // An empty file parses as null; treat it like a missing file.
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(ConfigError::not_a_mapping(path)),
    }
}

/// Whether the path already ends in a supported config extension.
fn has_known_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.contains(&e))
}

/// Append `.ext` to a path without replacing an existing suffix.
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

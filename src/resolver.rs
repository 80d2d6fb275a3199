//! Priority-driven resolution of environment overlays and imports.
//!
//! Resolution is a bounded synchronous loop: while the document still carries
//! an environments table or an imports entry, the prioritized kind is drained
//! first, then the other kind is handled one step at a time so anything a
//! merge introduces is picked up on the next pass.

use crate::error::{ConfigError, Result};
use crate::files::FileLocator;
use crate::options::{FileOptions, LoadPriority, OPTIONS_KEY, ResolveOptions};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upper bound on resolution steps. Any realistic nesting depth is far below
/// this; hitting it means an import cycle.
const MAX_PASSES: u32 = 64;

/// A fully resolved configuration document.
#[derive(Debug, Clone)]
pub struct Config {
    value: Value,
    path: Option<PathBuf>,
}

impl Config {
    /// The resolved document.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    /// The base file the document was resolved from, if one was found.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Deserialize the resolved document into a caller type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value.clone()).map_err(ConfigError::Deserialize)
    }

    /// Consume the config, returning the resolved document.
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Resolves a base config file into a final merged document.
#[derive(Debug, Clone)]
pub struct Resolver {
    options: ResolveOptions,
    locator: FileLocator,
}

impl Resolver {
    /// Create a resolver with discovered search roots.
    pub fn new(options: impl Into<ResolveOptions>) -> Self {
        let options = options.into();
        let locator = FileLocator::discover_with(&options.search_roots);
        Self { options, locator }
    }

    /// Create a resolver with an explicit locator.
    pub fn with_locator(options: ResolveOptions, locator: FileLocator) -> Self {
        Self { options, locator }
    }

    /// The options this resolver was built with.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Run the full pipeline: load the base file, honor embedded options,
    /// drain environment overlays and imports, and optionally publish.
    pub fn resolve(&self) -> Result<Config> {
        let (mut base, path) = self.locator.load_with_path(&self.options.path)?;

        // An embedded options table overrides the caller's options. Only the
        // base document's table applies; one merged in later is inert.
        let mut options = self.options.clone();
        if let Value::Object(ref mut map) = base
            && let Some(embedded) = map.remove(OPTIONS_KEY)
        {
            let file_options: FileOptions =
                serde_json::from_value(embedded).map_err(ConfigError::MalformedOptions)?;
            file_options.apply_to(&mut options);
        }

        debug!(
            path = ?path,
            env = ?options.env,
            priority = %options.priority,
            merge = %options.merge,
            "resolving configuration"
        );

        let mut value = resolve_value(base, &options, &self.locator)?;

        // An import or environment overlay may have carried its own options
        // table into the document; the resolved output never includes it.
        if let Value::Object(ref mut map) = value {
            map.remove(OPTIONS_KEY);
        }

        let config = Config { value, path };

        if options.publish {
            crate::publish::publish(config.clone());
        }

        Ok(config)
    }
}

/// Resolve with the given options (a path string also works).
pub fn resolve(options: impl Into<ResolveOptions>) -> Result<Config> {
    Resolver::new(options).resolve()
}

/// Probe the default config location and resolve it if it opts in.
///
/// Returns `Ok(None)` when no file exists at the default path, or when the
/// file carries no embedded options enabling autoload. A successfully
/// autoloaded config is always published.
pub fn autoload() -> Result<Option<Config>> {
    let options = ResolveOptions::default();
    let locator = FileLocator::discover_with(&options.search_roots);
    autoload_with(options, locator)
}

/// Autoload against explicit options and locator.
///
/// Useful when the default search roots or config path do not apply.
pub fn autoload_with(mut options: ResolveOptions, locator: FileLocator) -> Result<Option<Config>> {
    if !locator.exists(&options.path) {
        return Ok(None);
    }

    let probe = locator.load(&options.path)?;
    let Some(embedded) = probe.get(OPTIONS_KEY) else {
        return Ok(None);
    };
    let file_options: FileOptions =
        serde_json::from_value(embedded.clone()).map_err(ConfigError::MalformedOptions)?;
    if !file_options.autoload() {
        return Ok(None);
    }

    file_options.apply_to(&mut options);
    options.publish = true;

    let config = Resolver::with_locator(options, locator).resolve()?;
    Ok(Some(config))
}

/// Drain environment overlays and imports until neither key remains.
fn resolve_value(
    mut value: Value,
    options: &ResolveOptions,
    locator: &FileLocator,
) -> Result<Value> {
    let mut passes = 0u32;

    while has_key(&value, &options.environments_key) || has_key(&value, &options.imports_key) {
        // Drain the prioritized kind completely; nested occurrences are
        // re-checked after every step.
        while options.priority == LoadPriority::Import && has_key(&value, &options.imports_key) {
            bump(&mut passes)?;
            value = process_imports(value, options, locator)?;
        }

        while options.priority == LoadPriority::Environment
            && has_key(&value, &options.environments_key)
        {
            bump(&mut passes)?;
            value = apply_environment(value, options);
        }

        // The non-prioritized kind advances one step per outer pass so the
        // loop notices anything a merge just introduced.
        if has_key(&value, &options.imports_key) {
            bump(&mut passes)?;
            value = process_imports(value, options, locator)?;
        }

        if has_key(&value, &options.environments_key) {
            bump(&mut passes)?;
            value = apply_environment(value, options);
        }
    }

    Ok(value)
}

fn has_key(value: &Value, key: &str) -> bool {
    value.get(key).is_some()
}

fn bump(passes: &mut u32) -> Result<()> {
    *passes += 1;
    if *passes > MAX_PASSES {
        return Err(ConfigError::ResolutionLimit { limit: MAX_PASSES });
    }
    Ok(())
}

/// Overlay the entry for the active environment, stripping the table.
///
/// The table is stripped even when no overlay applies (no active environment,
/// or no entry for it).
fn apply_environment(value: Value, options: &ResolveOptions) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };
    let environments = map.remove(&options.environments_key);
    let base = Value::Object(map);

    let Some(Value::Object(mut table)) = environments else {
        return base;
    };
    let Some(ref env) = options.env else {
        debug!("environment table present but no active environment set");
        return base;
    };

    match table.remove(env) {
        Some(overlay) => {
            debug!(env = %env, "applying environment overlay");
            options.merge.merge(base, overlay)
        }
        None => {
            debug!(env = %env, "no overlay for active environment");
            base
        }
    }
}

/// Load each imported file and overlay it, stripping the imports entry.
///
/// The entry may be a single path or an array of paths; imported documents
/// are merged in order, each winning over what came before.
fn process_imports(value: Value, options: &ResolveOptions, locator: &FileLocator) -> Result<Value> {
    let Value::Object(mut map) = value else {
        return Ok(value);
    };

    let specs: Vec<String> = match map.remove(&options.imports_key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(spec)) => vec![spec],
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(spec) => Ok(spec),
                _ => Err(ConfigError::MalformedImports {
                    key: options.imports_key.clone(),
                }),
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => {
            return Err(ConfigError::MalformedImports {
                key: options.imports_key.clone(),
            });
        }
    };

    let mut value = Value::Object(map);
    for spec in specs {
        debug!(import = %spec, "merging imported config");
        let imported = locator.load(Path::new(&spec))?;
        value = options.merge.merge(value, imported);
    }

    Ok(value)
}

//! Merge strategies for configuration documents.
//!
//! Overlays are applied with the overlay side winning. The shallow strategy
//! replaces whole top-level entries; the deep strategy merges mappings
//! recursively.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How an overlay document is combined with a base document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Top-level keys of the overlay replace those of the base (default).
    #[default]
    Shallow,
    /// Mappings are merged recursively; other values are replaced.
    Deep,
}

impl MergeStrategy {
    /// Merge `patch` over `base` using this strategy.
    pub fn merge(self, base: Value, patch: Value) -> Value {
        match self {
            MergeStrategy::Shallow => overlay(base, patch),
            MergeStrategy::Deep => deep_merge(base, patch),
        }
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeStrategy::Shallow => write!(f, "shallow"),
            MergeStrategy::Deep => write!(f, "deep"),
        }
    }
}

/// Shallow overlay: each top-level key of `patch` replaces the corresponding
/// key of `base` entirely. Keys only present in `base` are kept.
///
/// If either side is not a mapping, `patch` wins unless it is null.
pub fn overlay(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                base_map.insert(key, value);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, patch) => patch,
    }
}

/// Deep merge two values, with `patch` taking precedence over `base`.
///
/// - Mappings are merged recursively: keys in the patch override keys in base
/// - Arrays, strings, numbers, booleans are replaced entirely
/// - If the patch value is null, the base value is preserved
pub fn deep_merge(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                let merged = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, patch_value)
                } else {
                    patch_value
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, patch) => patch,
    }
}

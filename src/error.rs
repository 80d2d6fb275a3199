//! Error types for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors produced while locating, parsing, or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file was found but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file was read but could not be parsed as YAML.
    #[error("failed to parse {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A file was read but could not be parsed as JSON.
    #[error("failed to parse {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A document's top-level value was not a mapping.
    #[error("{path}: top-level value must be a mapping")]
    NotAMapping { path: PathBuf },

    /// The imports entry was neither a string nor an array of strings.
    #[error("imports entry '{key}' must be a string or an array of strings")]
    MalformedImports { key: String },

    /// The embedded resolver options table could not be deserialized.
    #[error("embedded resolver options are malformed: {0}")]
    MalformedOptions(#[source] serde_json::Error),

    /// The resolution loop did not converge.
    ///
    /// Usually caused by an import cycle, where resolving one pass
    /// reintroduces the keys the pass just consumed.
    #[error("resolution did not converge after {limit} passes (import cycle?)")]
    ResolutionLimit { limit: u32 },

    /// The resolved config could not be deserialized into the requested type.
    #[error("failed to deserialize resolved config: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl ConfigError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a not-a-mapping error.
    pub fn not_a_mapping(path: impl Into<PathBuf>) -> Self {
        ConfigError::NotAMapping { path: path.into() }
    }
}

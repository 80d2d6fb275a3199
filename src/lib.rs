//! Layered configuration resolution.
//!
//! A base config file is located, parsed, and merged with two kinds of
//! overlay until neither remains:
//! - **Environments** — a per-environment table (default key `_environments`)
//!   whose entry for the active environment is overlaid onto the document.
//! - **Imports** — referenced files (default key `_imports`, a string or an
//!   array of strings) loaded and overlaid in order.
//!
//! A configurable priority decides which kind is drained first, so nested
//! occurrences introduced by either merge resolve deterministically.
//!
//! ## Merge strategy
//! - `shallow` (default): top-level keys of the overlay replace those of the base
//! - `deep`: mappings merged recursively, overlay null preserves the base
//!
//! ## Environment variables
//! - `CONFSTACK_ENV` - active environment name
//! - `CONFSTACK_CONFIG_PATH` - base config path (default: `config`)
//!
//! ## Example
//! ```no_run
//! let config = confstack::resolve("config/app")?;
//! let port = config.get("port");
//! # Ok::<(), confstack::ConfigError>(())
//! ```

pub mod error;
pub mod files;
pub mod merge;
pub mod options;
pub mod publish;
pub mod resolver;

pub use error::{ConfigError, Result};
pub use files::FileLocator;
pub use merge::{MergeStrategy, deep_merge, overlay};
pub use options::{FileOptions, LoadPriority, ResolveOptions};
pub use publish::{current, publish};
pub use resolver::{Config, Resolver, autoload, resolve};

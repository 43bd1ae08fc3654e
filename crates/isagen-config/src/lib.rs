//! isagen configuration
//!
//! Generator and machine settings stored in `isagen.toml`.
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Built-in defaults
//! 2. Project config (`isagen.toml`, found by walking up from the start directory)
//! 3. Environment variables (`ISAGEN_*`)
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use isagen_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("stack slots: {}", config.project.stack_slots());
//! ```

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or validate `isagen.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("isagen.toml not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read isagen.toml: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid isagen.toml at {file}: {source}")]
    Parse {
        file: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// File name searched for by [`ConfigLoader`]
pub const CONFIG_FILE_NAME: &str = "isagen.toml";

pub use loader::{Config, ConfigLoader};
pub use project::{GeneratorConfig, MachineSection, ProjectConfig};

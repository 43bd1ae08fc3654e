//! CLI command implementations

pub mod check;
pub mod render;
pub mod summary;

use anyhow::{anyhow, Context, Result};
use isagen_config::{Config, ConfigLoader};
use isagen_tables::{InstructionSet, InstructionSpec};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load isagen.toml from the current directory or one of its parents
pub fn load_config() -> Result<Config> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let config = ConfigLoader::new()
        .load_from_directory(&cwd)
        .context("Failed to load isagen.toml")?;
    if let Some(root) = config.project_root() {
        debug!(root = %root.display(), "using project configuration");
    }
    Ok(config)
}

/// The specification named on the command line, else the configured one
pub fn resolve_spec(arg: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    arg.or_else(|| config.spec_path()).ok_or_else(|| {
        anyhow!("No specification given: pass a path or set `spec` under [generator] in isagen.toml")
    })
}

/// Read and compile a specification file
pub fn compile(path: &Path) -> Result<InstructionSet> {
    InstructionSpec::compile_file(path)
        .with_context(|| format!("Failed to compile specification: {}", path.display()))
}

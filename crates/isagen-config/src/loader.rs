//! isagen.toml discovery
//!
//! Finds `isagen.toml` and applies environment overrides on top of it.

use crate::project::ProjectConfig;
use crate::{ConfigError, ConfigResult, CONFIG_FILE_NAME};
use std::env;
use std::path::{Path, PathBuf};

/// Locates and layers configuration
///
/// Precedence, lowest first:
/// 1. Built-in defaults
/// 2. Project config (isagen.toml)
/// 3. Environment variables (ISAGEN_*)
/// 4. CLI flags (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Skip `ISAGEN_*` environment overrides
    ignore_env: bool,
}

/// Project settings plus where they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Project configuration, with environment overrides applied
    pub project: ProjectConfig,

    /// Directory containing isagen.toml, if one was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader that honors `ISAGEN_*` overrides
    pub fn new() -> Self {
        Self { ignore_env: false }
    }

    /// Loader that leaves `ISAGEN_*` variables alone
    pub fn without_env() -> Self {
        Self { ignore_env: true }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find isagen.toml. A missing file is not
    /// an error; defaults (plus environment overrides) are used instead.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = self.find_project_config(start_dir)?;
        let project = self.apply_env_overrides(project)?;
        Ok(Config {
            project,
            project_root,
        })
    }

    /// Load configuration from a specific isagen.toml
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let project = self.apply_env_overrides(project)?;
        Ok(Config {
            project,
            project_root: config_path.parent().map(Path::to_path_buf),
        })
    }

    /// Nearest isagen.toml at or above `start_dir`, with its directory
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let found = start_dir
            .ancestors()
            .map(|dir| (dir, dir.join(CONFIG_FILE_NAME)))
            .find(|(_, candidate)| candidate.is_file());

        match found {
            Some((dir, path)) => {
                let project = ProjectConfig::load_from_file(&path)?;
                Ok((Some(dir.to_path_buf()), project))
            }
            None => Ok((None, ProjectConfig::default())),
        }
    }

    /// Layer `ISAGEN_*` variables over the file settings, then re-validate
    ///
    /// Recognized: ISAGEN_SPEC, ISAGEN_OUTPUT, ISAGEN_MODULE_DOC,
    /// ISAGEN_STACK_SLOTS, ISAGEN_MEMORY_BYTES.
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if self.ignore_env {
            return Ok(config);
        }

        if let Some(spec) = env::var_os("ISAGEN_SPEC") {
            config.generator_mut().spec = Some(PathBuf::from(spec));
        }

        if let Some(output) = env::var_os("ISAGEN_OUTPUT") {
            config.generator_mut().output = Some(PathBuf::from(output));
        }

        if let Ok(module_doc) = env::var("ISAGEN_MODULE_DOC") {
            config.generator_mut().module_doc = Some(parse_flag("ISAGEN_MODULE_DOC", &module_doc)?);
        }

        if let Ok(slots) = env::var("ISAGEN_STACK_SLOTS") {
            config.machine_mut().stack_slots = Some(parse_count("ISAGEN_STACK_SLOTS", &slots)?);
        }

        if let Ok(bytes) = env::var("ISAGEN_MEMORY_BYTES") {
            config.machine_mut().memory_bytes = Some(parse_count("ISAGEN_MEMORY_BYTES", &bytes)?);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_count(field: &str, value: &str) -> ConfigResult<usize> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("'{}' is not a non-negative integer", value),
    })
}

fn parse_flag(field: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not one of true/false, 1/0, yes/no", value),
        }),
    }
}

impl Config {
    /// Directory holding isagen.toml, if one was found
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if this is a project (has isagen.toml)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Specification path, resolved against the project root
    pub fn spec_path(&self) -> Option<PathBuf> {
        self.project.spec().map(|p| self.resolve(p))
    }

    /// Output path, resolved against the project root
    pub fn output_path(&self) -> Option<PathBuf> {
        self.project.output().map(|p| self.resolve(p))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.project_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_relative_to_root() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[generator]\nspec = \"opcodes.toml\"\n",
        )
        .unwrap();

        let config = ConfigLoader::without_env()
            .load_from_directory(temp_dir.path())
            .unwrap();
        assert_eq!(config.spec_path(), Some(temp_dir.path().join("opcodes.toml")));
        assert_eq!(config.output_path(), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("X", " 42 ").unwrap(), 42);
        assert!(matches!(
            parse_count("X", "-1"),
            Err(ConfigError::InvalidValue { field, .. }) if field == "X"
        ));
    }
}

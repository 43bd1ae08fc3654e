//! Project Configuration (isagen.toml)
//!
//! ```toml
//! [generator]
//! spec = "specs/wasm-core.toml"
//! output = "src/generated.rs"
//! module_doc = true
//!
//! [machine]
//! stack_slots = 65536
//! memory_bytes = 65536
//! ```

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default operand-stack capacity, in slots
pub const DEFAULT_STACK_SLOTS: usize = 65536;

/// Default linear-memory size, in bytes
pub const DEFAULT_MEMORY_BYTES: usize = 65536;

/// Linear memory is addressed with 32-bit addresses
pub const MAX_MEMORY_BYTES: u64 = 1 << 32;

/// Project configuration from isagen.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Table generator settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorConfig>,

    /// Host machine settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<MachineSection>,
}

/// `[generator]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Instruction-set specification file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<PathBuf>,

    /// Where rendered Rust source is written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Emit a header comment in rendered source (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_doc: Option<bool>,
}

/// `[machine]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct MachineSection {
    /// Operand-stack capacity (default: 65536)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_slots: Option<usize>,

    /// Linear-memory size in bytes (default: 65536)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_bytes: Option<usize>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Io(e)
            }
        })?;

        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            file: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text without validating it
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(generator) = &self.generator {
            if generator.spec.as_deref() == Some(Path::new("")) {
                return Err(ConfigError::InvalidValue {
                    field: "generator.spec".to_string(),
                    reason: "path cannot be empty".to_string(),
                });
            }
        }

        if let Some(machine) = &self.machine {
            if machine.stack_slots == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: "machine.stack_slots".to_string(),
                    reason: "the operand stack needs at least one slot".to_string(),
                });
            }
            if let Some(bytes) = machine.memory_bytes {
                if bytes as u64 > MAX_MEMORY_BYTES {
                    return Err(ConfigError::InvalidValue {
                        field: "machine.memory_bytes".to_string(),
                        reason: format!("{} exceeds the 4 GiB address space", bytes),
                    });
                }
            }
        }

        Ok(())
    }

    /// Specification path as written in the file, if any
    pub fn spec(&self) -> Option<&Path> {
        self.generator.as_ref().and_then(|g| g.spec.as_deref())
    }

    /// Output path as written in the file, if any
    pub fn output(&self) -> Option<&Path> {
        self.generator.as_ref().and_then(|g| g.output.as_deref())
    }

    pub fn module_doc(&self) -> bool {
        self.generator
            .as_ref()
            .and_then(|g| g.module_doc)
            .unwrap_or(true)
    }

    pub fn stack_slots(&self) -> usize {
        self.machine
            .as_ref()
            .and_then(|m| m.stack_slots)
            .unwrap_or(DEFAULT_STACK_SLOTS)
    }

    pub fn memory_bytes(&self) -> usize {
        self.machine
            .as_ref()
            .and_then(|m| m.memory_bytes)
            .unwrap_or(DEFAULT_MEMORY_BYTES)
    }

    pub(crate) fn generator_mut(&mut self) -> &mut GeneratorConfig {
        self.generator.get_or_insert_with(Default::default)
    }

    pub(crate) fn machine_mut(&mut self) -> &mut MachineSection {
        self.machine.get_or_insert_with(Default::default)
    }
}

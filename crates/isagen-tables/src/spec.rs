//! TOML instruction-set specifications
//!
//! ```toml
//! [[opcode]]
//! name = "i32.load"
//! encoding = [0x28]
//! immediates = ["mem_arg"]
//! args = ["i32"]
//! results = ["i32"]
//! flags = { memory = true }
//!
//! [[opcode]]
//! name = "memory.fill"
//! encoding = [0xfc, 11]
//! immediates = ["memory"]
//! flags = { control = true }
//! ```

use crate::error::{LoadError, SpecResult};
use crate::isa::InstructionSet;
use crate::record::OpcodeRecord;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// An ordered list of opcode records, as loaded from a file
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstructionSpec {
    #[serde(default, rename = "opcode")]
    pub opcodes: Vec<OpcodeRecord>,
}

impl InstructionSpec {
    pub fn new(opcodes: Vec<OpcodeRecord>) -> Self {
        Self { opcodes }
    }

    /// Parse a specification from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a specification file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), opcodes = spec.opcodes.len(), "specification loaded");
        Ok(spec)
    }

    /// Load and compile in one step
    pub fn compile_file(path: &Path) -> Result<InstructionSet, LoadError> {
        let spec = Self::load(path)?;
        Ok(spec.compile()?)
    }

    pub fn compile(&self) -> SpecResult<InstructionSet> {
        InstructionSet::compile(&self.opcodes)
    }
}

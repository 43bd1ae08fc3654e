//! Compiled instruction set
//!
//! [`InstructionSet::compile`] runs the table passes in dependency order
//! (ids first, then dispatch, then classes) and only returns once all of
//! them succeed. Consumers never observe a half-built table.

use crate::classify::{classify, OpcodeClass};
use crate::dispatch::{DispatchEntry, DispatchTable, PrefixId};
use crate::enumeration::{OpcodeEnumeration, OpcodeId};
use crate::error::{DecodeError, SpecResult};
use crate::leb128;
use crate::record::OpcodeRecord;
use tracing::{debug, info, instrument};

/// Decoding and validation tables for one instruction set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSet {
    enumeration: OpcodeEnumeration,
    dispatch: DispatchTable,
    classes: Vec<OpcodeClass>,
}

/// Per-bucket opcode counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassCounts {
    pub basic: usize,
    pub memory: usize,
    pub special: usize,
}

impl InstructionSet {
    /// Compile `records`, stopping at the first violated invariant
    #[instrument(skip(records), fields(opcodes = records.len()))]
    pub fn compile(records: &[OpcodeRecord]) -> SpecResult<Self> {
        let enumeration = OpcodeEnumeration::build(records)?;
        debug!(opcodes = enumeration.len(), "opcode ids assigned");

        let dispatch = DispatchTable::build(records, &enumeration)?;
        debug!(prefixes = dispatch.prefix_tables().len(), "dispatch tables built");

        let classes = enumeration
            .ids()
            .zip(records)
            .map(|(id, record)| classify(id, record))
            .collect::<SpecResult<Vec<_>>>()?;

        let set = Self {
            enumeration,
            dispatch,
            classes,
        };
        let counts = set.class_counts();
        info!(
            opcodes = set.len(),
            basic = counts.basic,
            memory = counts.memory,
            special = counts.special,
            "instruction set compiled"
        );
        Ok(set)
    }

    /// Number of opcodes, `N`
    pub fn len(&self) -> usize {
        self.enumeration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enumeration.is_empty()
    }

    pub fn enumeration(&self) -> &OpcodeEnumeration {
        &self.enumeration
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn opcode(&self, name: &str) -> Option<OpcodeId> {
        self.enumeration.id(name)
    }

    pub fn name(&self, id: OpcodeId) -> &str {
        self.enumeration.name(id)
    }

    #[inline(always)]
    pub fn decode(&self, byte: u8) -> DispatchEntry {
        self.dispatch.decode(byte)
    }

    #[inline]
    pub fn decode_prefixed(&self, prefix: PrefixId, suffix: u32) -> Option<OpcodeId> {
        self.dispatch.decode_prefixed(prefix, suffix)
    }

    #[inline(always)]
    pub fn class(&self, id: OpcodeId) -> &OpcodeClass {
        &self.classes[id.index()]
    }

    /// Classes indexed by opcode id
    pub fn classes(&self) -> &[OpcodeClass] {
        &self.classes
    }

    pub fn class_counts(&self) -> ClassCounts {
        let mut counts = ClassCounts::default();
        for class in &self.classes {
            match class {
                OpcodeClass::Basic { .. } => counts.basic += 1,
                OpcodeClass::Memory { .. } => counts.memory += 1,
                OpcodeClass::Special(_) => counts.special += 1,
            }
        }
        counts
    }

    /// Decode the opcode at the start of `bytes`
    ///
    /// Returns the opcode and how many bytes it occupied. Immediates that
    /// follow are left to the caller.
    pub fn read_opcode(&self, bytes: &[u8]) -> Result<(OpcodeId, usize), DecodeError> {
        let byte = *bytes.first().ok_or(DecodeError::UnexpectedEnd { offset: 0 })?;
        match self.decode(byte) {
            DispatchEntry::Opcode(id) => Ok((id, 1)),
            DispatchEntry::Prefix(prefix) => {
                let (suffix, len) = leb128::read_u32(bytes, 1)?;
                self.decode_prefixed(prefix, suffix)
                    .map(|id| (id, 1 + len))
                    .ok_or(DecodeError::UnknownPrefixed {
                        prefix: byte,
                        suffix,
                    })
            }
            DispatchEntry::Invalid => Err(DecodeError::InvalidOpcode { byte }),
        }
    }
}

//! Dense opcode ids
//!
//! Ids are assigned in specification order, so they are stable as long as the
//! specification is. One bit of a `u16` is kept free so a packed dispatch
//! entry could still tell an opcode id from a prefix marker.

use crate::error::{SpecError, SpecResult};
use crate::record::OpcodeRecord;
use std::collections::HashMap;
use std::fmt;

/// Largest number of opcodes a specification may define (2^15)
pub const MAX_OPCODES: usize = 0x8000;

/// Dense opcode id in `0..N`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpcodeId(u16);

impl OpcodeId {
    /// Callers guarantee `index < MAX_OPCODES`
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < MAX_OPCODES);
        OpcodeId(index as u16)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for OpcodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bidirectional name ↔ id mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeEnumeration {
    names: Vec<String>,
    ids: HashMap<String, OpcodeId>,
}

impl OpcodeEnumeration {
    /// Assign ids to `records` in order
    pub fn build(records: &[OpcodeRecord]) -> SpecResult<Self> {
        if records.is_empty() {
            return Err(SpecError::Empty);
        }
        if records.len() > MAX_OPCODES {
            return Err(SpecError::TooManyOpcodes {
                count: records.len(),
                max: MAX_OPCODES,
            });
        }

        let mut names = Vec::with_capacity(records.len());
        let mut ids = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let id = OpcodeId::new(index);
            if ids.insert(record.name.clone(), id).is_some() {
                return Err(SpecError::DuplicateName {
                    name: record.name.clone(),
                });
            }
            names.push(record.name.clone());
        }

        Ok(Self { names, ids })
    }

    /// Number of opcodes, `N`
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<OpcodeId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: OpcodeId) -> &str {
        &self.names[id.index()]
    }

    /// Id for a raw index, if it is in range
    pub fn from_index(&self, index: usize) -> Option<OpcodeId> {
        (index < self.names.len()).then(|| OpcodeId::new(index))
    }

    pub fn ids(&self) -> impl ExactSizeIterator<Item = OpcodeId> + '_ {
        (0..self.names.len()).map(OpcodeId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Encoding;

    fn record(name: &str, byte: u8) -> OpcodeRecord {
        OpcodeRecord::new(name, Encoding::byte(byte))
    }

    #[test]
    fn test_ids_follow_specification_order() {
        let records = vec![record("nop", 0x01), record("drop", 0x1a), record("end", 0x0b)];
        let enumeration = OpcodeEnumeration::build(&records).unwrap();

        assert_eq!(enumeration.len(), 3);
        assert_eq!(enumeration.id("nop").map(OpcodeId::index), Some(0));
        assert_eq!(enumeration.id("drop").map(OpcodeId::index), Some(1));
        assert_eq!(enumeration.id("end").map(OpcodeId::index), Some(2));
        assert_eq!(enumeration.name(enumeration.id("end").unwrap()), "end");
        assert_eq!(enumeration.id("select"), None);
    }

    #[test]
    fn test_empty_specification() {
        assert_eq!(OpcodeEnumeration::build(&[]), Err(SpecError::Empty));
    }

    #[test]
    fn test_duplicate_name() {
        let records = vec![record("nop", 0x01), record("nop", 0x02)];
        assert_eq!(
            OpcodeEnumeration::build(&records),
            Err(SpecError::DuplicateName {
                name: "nop".to_string()
            })
        );
    }

    #[test]
    fn test_id_space_limit() {
        let records: Vec<_> = (0..=MAX_OPCODES)
            .map(|i| OpcodeRecord::new(format!("op{}", i), Encoding::prefixed(0xfc, i as u32)))
            .collect();
        assert_eq!(
            OpcodeEnumeration::build(&records),
            Err(SpecError::TooManyOpcodes {
                count: MAX_OPCODES + 1,
                max: MAX_OPCODES,
            })
        );
        assert!(OpcodeEnumeration::build(&records[..MAX_OPCODES]).is_ok());
    }
}

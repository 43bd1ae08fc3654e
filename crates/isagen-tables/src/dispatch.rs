//! Two-level instruction dispatch
//!
//! The outer table maps every byte value to exactly one [`DispatchEntry`]:
//! an opcode, a prefix marker, or `Invalid`. A prefix byte is followed by an
//! unsigned integer suffix that is resolved through that prefix's
//! [`PrefixTable`]. Both lookups are total; a byte or suffix nobody claimed
//! is a "no match", never a panic, since decoded bytes are untrusted.

use crate::enumeration::{OpcodeEnumeration, OpcodeId};
use crate::error::{SpecError, SpecResult};
use crate::record::{Encoding, OpcodeRecord};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Index of a prefix table, assigned in ascending prefix-byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrefixId(u8);

impl PrefixId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a single leading byte decodes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchEntry {
    /// The byte alone is a complete opcode
    Opcode(OpcodeId),
    /// The byte starts a prefixed opcode; decode a suffix next
    Prefix(PrefixId),
    /// No opcode starts with this byte
    Invalid,
}

/// Suffix → opcode mapping for one prefix byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable {
    prefix: u8,
    /// Sorted by suffix
    entries: Vec<(u32, OpcodeId)>,
}

impl PrefixTable {
    /// The prefix byte this table belongs to
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Resolve a suffix; `None` when no opcode uses it
    #[inline]
    pub fn lookup(&self, suffix: u32) -> Option<OpcodeId> {
        self.entries
            .binary_search_by_key(&suffix, |&(key, _)| key)
            .ok()
            .map(|slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(suffix, opcode)` pairs in ascending suffix order
    pub fn iter(&self) -> impl Iterator<Item = (u32, OpcodeId)> + '_ {
        self.entries.iter().copied()
    }
}

/// The 256-entry outer table plus one suffix table per prefix byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    outer: [DispatchEntry; 256],
    prefixes: Vec<PrefixTable>,
}

impl DispatchTable {
    /// Build the tables for `records`, whose ids come from `enumeration`
    ///
    /// Fails on the first encoding collision: a byte claimed twice, a
    /// `(prefix, suffix)` pair claimed twice, or a byte used both as an
    /// opcode and as a prefix.
    pub fn build(records: &[OpcodeRecord], enumeration: &OpcodeEnumeration) -> SpecResult<Self> {
        debug_assert_eq!(records.len(), enumeration.len());

        let mut singles: [Option<OpcodeId>; 256] = [None; 256];
        let mut prefixed: BTreeMap<u8, BTreeMap<u32, OpcodeId>> = BTreeMap::new();
        let name = |id: OpcodeId| enumeration.name(id).to_string();

        for (id, record) in enumeration.ids().zip(records) {
            match record.encoding {
                Encoding::Single(byte) => {
                    if let Some(existing) = singles[byte as usize] {
                        return Err(SpecError::DuplicateByte {
                            byte,
                            existing: name(existing),
                            duplicate: record.name.clone(),
                        });
                    }
                    if let Some(first) = prefixed.get(&byte).and_then(|t| t.values().next()) {
                        return Err(SpecError::PrefixConflict {
                            byte,
                            opcode: record.name.clone(),
                            prefixed: name(*first),
                        });
                    }
                    singles[byte as usize] = Some(id);
                }
                Encoding::Prefixed { prefix, suffix } => {
                    if let Some(opcode) = singles[prefix as usize] {
                        return Err(SpecError::PrefixConflict {
                            byte: prefix,
                            opcode: name(opcode),
                            prefixed: record.name.clone(),
                        });
                    }
                    let table = prefixed.entry(prefix).or_default();
                    if let Some(existing) = table.get(&suffix) {
                        return Err(SpecError::DuplicatePrefixed {
                            prefix,
                            suffix,
                            existing: name(*existing),
                            duplicate: record.name.clone(),
                        });
                    }
                    table.insert(suffix, id);
                }
            }
            trace!(opcode = %record.name, encoding = %record.encoding, "encoding registered");
        }

        let mut outer = [DispatchEntry::Invalid; 256];
        for (byte, slot) in singles.iter().enumerate() {
            if let Some(id) = slot {
                outer[byte] = DispatchEntry::Opcode(*id);
            }
        }

        // At most 256 distinct prefix bytes, so every PrefixId fits in a u8.
        let mut prefixes = Vec::with_capacity(prefixed.len());
        for (index, (prefix, table)) in prefixed.into_iter().enumerate() {
            outer[prefix as usize] = DispatchEntry::Prefix(PrefixId(index as u8));
            debug!(prefix, opcodes = table.len(), "prefix table built");
            prefixes.push(PrefixTable {
                prefix,
                entries: table.into_iter().collect(),
            });
        }

        Ok(Self { outer, prefixes })
    }

    /// Decode a leading byte
    #[inline(always)]
    pub fn decode(&self, byte: u8) -> DispatchEntry {
        self.outer[byte as usize]
    }

    /// Resolve a prefixed opcode; `None` when the suffix is unassigned
    #[inline]
    pub fn decode_prefixed(&self, prefix: PrefixId, suffix: u32) -> Option<OpcodeId> {
        self.prefixes
            .get(prefix.index())
            .and_then(|table| table.lookup(suffix))
    }

    /// All 256 outer entries, indexed by byte value
    pub fn entries(&self) -> &[DispatchEntry; 256] {
        &self.outer
    }

    pub fn prefix_table(&self, prefix: PrefixId) -> Option<&PrefixTable> {
        self.prefixes.get(prefix.index())
    }

    pub fn prefix_tables(&self) -> &[PrefixTable] {
        &self.prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(records: &[OpcodeRecord]) -> SpecResult<(OpcodeEnumeration, DispatchTable)> {
        let enumeration = OpcodeEnumeration::build(records)?;
        let table = DispatchTable::build(records, &enumeration)?;
        Ok((enumeration, table))
    }

    #[test]
    fn test_single_and_prefixed() {
        let records = vec![
            OpcodeRecord::new("i32.add", Encoding::byte(0x6a)),
            OpcodeRecord::new("memory.copy", Encoding::prefixed(0xfc, 10)),
            OpcodeRecord::new("memory.fill", Encoding::prefixed(0xfc, 11)),
        ];
        let (enumeration, table) = build(&records).unwrap();

        let add = enumeration.id("i32.add").unwrap();
        assert_eq!(table.decode(0x6a), DispatchEntry::Opcode(add));
        assert_eq!(table.decode(0x00), DispatchEntry::Invalid);

        let DispatchEntry::Prefix(prefix) = table.decode(0xfc) else {
            panic!("0xfc should be a prefix");
        };
        assert_eq!(table.decode_prefixed(prefix, 10), enumeration.id("memory.copy"));
        assert_eq!(table.decode_prefixed(prefix, 11), enumeration.id("memory.fill"));
        assert_eq!(table.decode_prefixed(prefix, 12), None);
        assert_eq!(table.prefix_table(prefix).map(PrefixTable::prefix), Some(0xfc));
    }

    #[test]
    fn test_prefix_ids_follow_byte_order() {
        let records = vec![
            OpcodeRecord::new("simd.op", Encoding::prefixed(0xfd, 0)),
            OpcodeRecord::new("misc.op", Encoding::prefixed(0xfc, 0)),
        ];
        let (_, table) = build(&records).unwrap();

        let bytes: Vec<u8> = table.prefix_tables().iter().map(PrefixTable::prefix).collect();
        assert_eq!(bytes, vec![0xfc, 0xfd]);
        assert!(matches!(table.decode(0xfc), DispatchEntry::Prefix(p) if p.index() == 0));
        assert!(matches!(table.decode(0xfd), DispatchEntry::Prefix(p) if p.index() == 1));
    }

    #[test]
    fn test_opcode_after_prefix_conflicts() {
        let records = vec![
            OpcodeRecord::new("memory.copy", Encoding::prefixed(0xfc, 10)),
            OpcodeRecord::new("bogus", Encoding::byte(0xfc)),
        ];
        assert_eq!(
            build(&records).unwrap_err(),
            SpecError::PrefixConflict {
                byte: 0xfc,
                opcode: "bogus".to_string(),
                prefixed: "memory.copy".to_string(),
            }
        );
    }
}

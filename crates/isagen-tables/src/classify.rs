//! Per-opcode type classification
//!
//! Every opcode lands in exactly one bucket, checked in this order:
//!
//! - **Special**: flagged `control` or `variable_immediate`. The static
//!   stack effect is empty; the validator derives the real one from the
//!   immediates.
//! - **Memory**: flagged `memory`. Natural alignment comes from the last
//!   decimal numeral in the name (`i64.load32_u` → 32 bits → 4 bytes).
//! - **Basic**: everything else; pop/push copied from the specification.
//!
//! Only Special and Memory opcodes may carry immediates.

use crate::enumeration::OpcodeId;
use crate::error::{SpecError, SpecResult};
use crate::record::{OpcodeRecord, ValueType};

/// Semantic descriptor of one opcode
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpcodeClass {
    /// Fixed stack effect
    Basic {
        pop: Vec<ValueType>,
        push: Vec<ValueType>,
    },
    /// Linear-memory access; `max_align` is in bytes
    Memory {
        max_align: u8,
        pop: Vec<ValueType>,
        push: Vec<ValueType>,
    },
    /// Stack effect resolved from immediates by the validator
    Special(OpcodeId),
}

impl OpcodeClass {
    /// Statically known popped types (empty for special opcodes)
    pub fn pop(&self) -> &[ValueType] {
        match self {
            OpcodeClass::Basic { pop, .. } | OpcodeClass::Memory { pop, .. } => pop,
            OpcodeClass::Special(_) => &[],
        }
    }

    /// Statically known pushed types (empty for special opcodes)
    pub fn push(&self) -> &[ValueType] {
        match self {
            OpcodeClass::Basic { push, .. } | OpcodeClass::Memory { push, .. } => push,
            OpcodeClass::Special(_) => &[],
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self, OpcodeClass::Special(_))
    }

    pub fn max_align(&self) -> Option<u8> {
        match self {
            OpcodeClass::Memory { max_align, .. } => Some(*max_align),
            _ => None,
        }
    }
}

/// Classify the record that was assigned `id`
pub fn classify(id: OpcodeId, record: &OpcodeRecord) -> SpecResult<OpcodeClass> {
    if record.flags.is_special() {
        if !record.args.is_empty() || !record.results.is_empty() {
            return Err(SpecError::SpecialWithOperands {
                name: record.name.clone(),
            });
        }
        return Ok(OpcodeClass::Special(id));
    }

    if record.flags.memory {
        let max_align = natural_alignment(&record.name).ok_or_else(|| {
            SpecError::MissingBitWidth {
                name: record.name.clone(),
            }
        })?;
        return Ok(OpcodeClass::Memory {
            max_align,
            pop: record.args.clone(),
            push: record.results.clone(),
        });
    }

    if !record.immediates.is_empty() {
        return Err(SpecError::BasicWithImmediates {
            name: record.name.clone(),
        });
    }

    Ok(OpcodeClass::Basic {
        pop: record.args.clone(),
        push: record.results.clone(),
    })
}

/// Byte alignment implied by the last run of decimal digits in `name`
///
/// Returns `None` when there is no numeral, or the width is zero, not a
/// whole number of bytes, or too large to describe.
pub fn natural_alignment(name: &str) -> Option<u8> {
    let bytes = name.as_bytes();
    let end = bytes.iter().rposition(u8::is_ascii_digit)? + 1;
    let start = bytes[..end]
        .iter()
        .rposition(|b| !b.is_ascii_digit())
        .map_or(0, |p| p + 1);

    let bits: u32 = name[start..end].parse().ok()?;
    if bits == 0 || bits % 8 != 0 {
        return None;
    }
    u8::try_from(bits / 8).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Encoding, ImmediateKind, OpcodeFlags};
    use rstest::rstest;

    fn id() -> OpcodeId {
        OpcodeId::new(0)
    }

    #[rstest]
    #[case("i32.load", Some(4))]
    #[case("i64.load", Some(8))]
    #[case("f32.store", Some(4))]
    #[case("i32.load8_u", Some(1))]
    #[case("i64.load16_s", Some(2))]
    #[case("i64.store32", Some(4))]
    #[case("v128.load", Some(16))]
    #[case("load", None)]
    #[case("x.load12", None)]
    #[case("x.load0", None)]
    #[case("x.load99999999999", None)]
    #[case("x.load4096", None)]
    fn test_natural_alignment(#[case] name: &str, #[case] expected: Option<u8>) {
        assert_eq!(natural_alignment(name), expected);
    }

    #[test]
    fn test_special_requires_empty_operands() {
        let record = OpcodeRecord::new("local.get", Encoding::byte(0x20))
            .with_immediates(&[ImmediateKind::Local])
            .with_results(&[ValueType::I32])
            .with_flags(OpcodeFlags::VARIABLE_IMMEDIATE);
        assert_eq!(
            classify(id(), &record),
            Err(SpecError::SpecialWithOperands {
                name: "local.get".to_string()
            })
        );
    }

    #[test]
    fn test_memory_may_carry_immediates() {
        let record = OpcodeRecord::new("i32.load16_u", Encoding::byte(0x2f))
            .with_immediates(&[ImmediateKind::MemArg])
            .with_args(&[ValueType::I32])
            .with_results(&[ValueType::I32])
            .with_flags(OpcodeFlags::MEMORY);
        let class = classify(id(), &record).unwrap();
        assert_eq!(class.max_align(), Some(2));
        assert_eq!(class.pop(), &[ValueType::I32]);
        assert_eq!(class.push(), &[ValueType::I32]);
    }

    #[test]
    fn test_basic_rejects_immediates() {
        let record = OpcodeRecord::new("i32.const", Encoding::byte(0x41))
            .with_immediates(&[ImmediateKind::I32])
            .with_results(&[ValueType::I32]);
        assert_eq!(
            classify(id(), &record),
            Err(SpecError::BasicWithImmediates {
                name: "i32.const".to_string()
            })
        );
    }

    #[test]
    fn test_control_wins_over_memory() {
        let record = OpcodeRecord::new("memory.size", Encoding::byte(0x3f))
            .with_immediates(&[ImmediateKind::Memory])
            .with_flags(OpcodeFlags {
                control: true,
                memory: true,
                variable_immediate: false,
            });
        assert_eq!(classify(id(), &record), Ok(OpcodeClass::Special(id())));
    }
}

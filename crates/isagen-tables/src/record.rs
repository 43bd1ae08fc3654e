//! Opcode records, the input data model
//!
//! One [`OpcodeRecord`] per instruction, in specification order. Records are
//! read-only once handed to the compiler; the order they arrive in is the
//! order opcode ids are assigned in.

use serde::Deserialize;
use std::fmt;

/// Value types an instruction can pop or push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    I32,
    I64,
    F32,
    F64,
    V128,
    FuncRef,
    ExternRef,
}

impl ValueType {
    /// Lower-case name as written in specifications
    pub fn name(self) -> &'static str {
        match self {
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::V128 => "v128",
            ValueType::FuncRef => "funcref",
            ValueType::ExternRef => "externref",
        }
    }

    /// Variant name, used when rendering Rust source
    pub fn variant(self) -> &'static str {
        match self {
            ValueType::I32 => "I32",
            ValueType::I64 => "I64",
            ValueType::F32 => "F32",
            ValueType::F64 => "F64",
            ValueType::V128 => "V128",
            ValueType::FuncRef => "FuncRef",
            ValueType::ExternRef => "ExternRef",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of an immediate operand encoded after the opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImmediateKind {
    I32,
    I64,
    F32,
    F64,
    /// Alignment hint and offset of a memory access
    MemArg,
    BlockType,
    Label,
    /// Vector of labels plus a default label
    LabelTable,
    Func,
    Type,
    Table,
    Local,
    Global,
    Memory,
    Data,
    Elem,
    RefType,
    /// Vector of value types (typed `select`)
    ValueTypes,
}

/// How an opcode is spelled in the byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Vec<u32>")]
pub enum Encoding {
    /// A single byte
    Single(u8),
    /// A prefix byte followed by an unsigned LEB128 suffix
    Prefixed { prefix: u8, suffix: u32 },
}

impl Encoding {
    pub fn byte(byte: u8) -> Self {
        Encoding::Single(byte)
    }

    pub fn prefixed(prefix: u8, suffix: u32) -> Self {
        Encoding::Prefixed { prefix, suffix }
    }

    /// The first byte of the encoding
    pub fn lead_byte(self) -> u8 {
        match self {
            Encoding::Single(byte) => byte,
            Encoding::Prefixed { prefix, .. } => prefix,
        }
    }
}

impl TryFrom<Vec<u32>> for Encoding {
    type Error = String;

    fn try_from(parts: Vec<u32>) -> Result<Self, Self::Error> {
        let lead = |value: u32| {
            u8::try_from(value).map_err(|_| format!("lead byte {:#x} does not fit in a byte", value))
        };
        match parts.as_slice() {
            [byte] => Ok(Encoding::Single(lead(*byte)?)),
            [prefix, suffix] => Ok(Encoding::Prefixed {
                prefix: lead(*prefix)?,
                suffix: *suffix,
            }),
            _ => Err(format!(
                "encoding must be [byte] or [prefix, suffix], got {} elements",
                parts.len()
            )),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Single(byte) => write!(f, "{:#04x}", byte),
            Encoding::Prefixed { prefix, suffix } => write!(f, "{:#04x} {}", prefix, suffix),
        }
    }
}

/// Attributes that steer classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpcodeFlags {
    /// Control-flow instruction whose effect the validator computes itself
    pub control: bool,
    /// Linear-memory access carrying a `mem_arg`
    pub memory: bool,
    /// Stack effect depends on the immediates (locals, globals, calls, ...)
    pub variable_immediate: bool,
}

impl OpcodeFlags {
    pub const NONE: OpcodeFlags = OpcodeFlags {
        control: false,
        memory: false,
        variable_immediate: false,
    };

    pub const CONTROL: OpcodeFlags = OpcodeFlags {
        control: true,
        ..OpcodeFlags::NONE
    };

    pub const MEMORY: OpcodeFlags = OpcodeFlags {
        memory: true,
        ..OpcodeFlags::NONE
    };

    pub const VARIABLE_IMMEDIATE: OpcodeFlags = OpcodeFlags {
        variable_immediate: true,
        ..OpcodeFlags::NONE
    };

    /// Special opcodes get no static stack effect in the class table
    pub fn is_special(self) -> bool {
        self.control || self.variable_immediate
    }
}

/// One instruction of the specification
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpcodeRecord {
    pub name: String,
    pub encoding: Encoding,
    #[serde(default)]
    pub immediates: Vec<ImmediateKind>,
    /// Popped operand types, bottom of stack first
    #[serde(default)]
    pub args: Vec<ValueType>,
    /// Pushed result types, bottom of stack first
    #[serde(default)]
    pub results: Vec<ValueType>,
    #[serde(default)]
    pub flags: OpcodeFlags,
}

impl OpcodeRecord {
    pub fn new(name: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            name: name.into(),
            encoding,
            immediates: Vec::new(),
            args: Vec::new(),
            results: Vec::new(),
            flags: OpcodeFlags::NONE,
        }
    }

    pub fn with_immediates(mut self, immediates: &[ImmediateKind]) -> Self {
        self.immediates = immediates.to_vec();
        self
    }

    pub fn with_args(mut self, args: &[ValueType]) -> Self {
        self.args = args.to_vec();
        self
    }

    pub fn with_results(mut self, results: &[ValueType]) -> Self {
        self.results = results.to_vec();
        self
    }

    pub fn with_flags(mut self, flags: OpcodeFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_from_parts() {
        assert_eq!(Encoding::try_from(vec![0x6a]), Ok(Encoding::Single(0x6a)));
        assert_eq!(
            Encoding::try_from(vec![0xfc, 10]),
            Ok(Encoding::prefixed(0xfc, 10))
        );
        assert!(Encoding::try_from(vec![]).is_err());
        assert!(Encoding::try_from(vec![1, 2, 3]).is_err());
        assert!(Encoding::try_from(vec![0x100]).is_err());
    }

    #[test]
    fn test_special_flags() {
        assert!(OpcodeFlags::CONTROL.is_special());
        assert!(OpcodeFlags::VARIABLE_IMMEDIATE.is_special());
        assert!(!OpcodeFlags::MEMORY.is_special());
        assert!(!OpcodeFlags::default().is_special());
    }

    #[test]
    fn test_encoding_display() {
        assert_eq!(Encoding::byte(0x41).to_string(), "0x41");
        assert_eq!(Encoding::prefixed(0xfc, 3).to_string(), "0xfc 3");
    }
}

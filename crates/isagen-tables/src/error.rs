//! Error types for specification compilation, loading and opcode decoding
//!
//! Specification errors are fatal: the compiler stops at the first violated
//! invariant and never hands out a partially built table. Decode errors are
//! the decoder's own taxonomy layered over the tables' "no match" results.

use std::path::PathBuf;
use thiserror::Error;

/// A violated instruction-set invariant, detected while compiling tables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// The specification lists no opcodes at all
    #[error("specification is empty")]
    Empty,

    /// More opcodes than the id space can address
    #[error("specification has {count} opcodes, at most {max} are addressable")]
    TooManyOpcodes { count: usize, max: usize },

    /// Two records share a name
    #[error("opcode name '{name}' is defined more than once")]
    DuplicateName { name: String },

    /// Two single-byte encodings collide
    #[error("byte {byte:#04x} is claimed by both '{existing}' and '{duplicate}'")]
    DuplicateByte {
        byte: u8,
        existing: String,
        duplicate: String,
    },

    /// Two prefixed encodings collide within one prefix
    #[error("encoding {prefix:#04x} {suffix} is claimed by both '{existing}' and '{duplicate}'")]
    DuplicatePrefixed {
        prefix: u8,
        suffix: u32,
        existing: String,
        duplicate: String,
    },

    /// A byte is used as a plain opcode and as a prefix byte
    #[error("byte {byte:#04x} is both opcode '{opcode}' and the prefix of '{prefixed}'")]
    PrefixConflict {
        byte: u8,
        opcode: String,
        prefixed: String,
    },

    /// A basic opcode declares immediate operands
    #[error("opcode '{name}' carries immediates but is neither special nor memory-shaped")]
    BasicWithImmediates { name: String },

    /// A special opcode declares a static stack effect
    #[error("special opcode '{name}' must not declare argument or result types")]
    SpecialWithOperands { name: String },

    /// A memory opcode whose name has no usable bit width
    #[error("memory opcode '{name}' has no bit width (a multiple of 8) in its name")]
    MissingBitWidth { name: String },
}

/// Failure to read an instruction-set specification file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read specification {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid specification syntax: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Failure to decode an opcode from untrusted bytes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before the opcode was complete
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// The outer table has no entry for this byte
    #[error("invalid opcode byte {byte:#04x}")]
    InvalidOpcode { byte: u8 },

    /// The prefix table has no entry for this suffix
    #[error("unknown opcode {prefix:#04x} {suffix}")]
    UnknownPrefixed { prefix: u8, suffix: u32 },

    /// The suffix is not a valid unsigned 32-bit LEB128 integer
    #[error("malformed LEB128 integer at offset {offset}")]
    MalformedInteger { offset: usize },
}

pub type SpecResult<T> = Result<T, SpecError>;

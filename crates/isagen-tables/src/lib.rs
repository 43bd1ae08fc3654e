//! isagen tables - instruction-set table compiler
//!
//! Turns an ordered list of opcode records into the tables a bytecode
//! decoder and validator need:
//! - dense opcode ids (`OpcodeId`)
//! - a 256-entry outer dispatch table plus one suffix table per prefix byte
//! - a per-opcode class (basic, memory or special) with its stack effect
//!
//! The compiled tables can be used directly through [`InstructionSet`] or
//! rendered to Rust source with [`render::render_rust`].

/// isagen-tables version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod classify;
pub mod dispatch;
pub mod enumeration;
pub mod error;
pub mod isa;
pub mod leb128;
pub mod record;
pub mod render;
pub mod spec;

// Re-export commonly used types
pub use classify::OpcodeClass;
pub use dispatch::{DispatchEntry, DispatchTable, PrefixId, PrefixTable};
pub use enumeration::{OpcodeEnumeration, OpcodeId, MAX_OPCODES};
pub use error::{DecodeError, LoadError, SpecError, SpecResult};
pub use isa::{ClassCounts, InstructionSet};
pub use record::{Encoding, ImmediateKind, OpcodeFlags, OpcodeRecord, ValueType};
pub use render::{render_rust, RenderOptions};
pub use spec::InstructionSpec;

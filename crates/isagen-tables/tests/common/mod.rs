//! Shared fixtures for isagen-tables integration tests

#![allow(dead_code)]

use isagen_tables::{
    Encoding, ImmediateKind, InstructionSet, InstructionSpec, OpcodeFlags, OpcodeRecord, ValueType,
};

/// WebAssembly core instruction set shipped in `specs/`
pub const WASM_CORE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../specs/wasm-core.toml"
));

pub fn wasm_core() -> InstructionSet {
    InstructionSpec::from_toml_str(WASM_CORE)
        .expect("wasm-core.toml should parse")
        .compile()
        .expect("wasm-core.toml should compile")
}

/// `i32.const` (0x41), `i32.add` (0x6a) and `memory.size` (0xfc 3)
pub fn small_records() -> Vec<OpcodeRecord> {
    vec![
        OpcodeRecord::new("i32.const", Encoding::byte(0x41))
            .with_immediates(&[ImmediateKind::I32])
            .with_flags(OpcodeFlags::VARIABLE_IMMEDIATE),
        OpcodeRecord::new("i32.add", Encoding::byte(0x6a))
            .with_args(&[ValueType::I32, ValueType::I32])
            .with_results(&[ValueType::I32]),
        OpcodeRecord::new("memory.size", Encoding::prefixed(0xfc, 3))
            .with_immediates(&[ImmediateKind::Memory])
            .with_flags(OpcodeFlags::CONTROL),
    ]
}

/// Unsigned LEB128 encoding of `value`
pub fn leb128(mut value: u32) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

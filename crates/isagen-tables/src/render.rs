//! Rust source rendering
//!
//! Emits the compiled tables as a self-contained Rust module, for projects
//! that generate their decoder tables ahead of time (from a build script or
//! the `isagen render` command) instead of compiling them at startup.

use crate::classify::OpcodeClass;
use crate::dispatch::DispatchEntry;
use crate::enumeration::OpcodeId;
use crate::isa::InstructionSet;
use crate::record::ValueType;
use std::collections::HashSet;

/// Knobs for [`render_rust`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit a "generated, do not edit" header comment
    pub header: bool,
    /// Path the generated module imports `ValueType` from
    pub value_type_path: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            header: true,
            value_type_path: "isagen_tables::ValueType".to_string(),
        }
    }
}

/// Render `set` as Rust source
pub fn render_rust(set: &InstructionSet, options: &RenderOptions) -> String {
    let variants = variant_names(set);
    let mut out = String::new();

    if options.header {
        out.push_str("// Generated by isagen from an instruction-set specification. Do not edit.\n\n");
    }
    out.push_str(&format!("use {};\n\n", options.value_type_path));

    render_opcode_enum(&mut out, &variants);
    render_prefix_enum(&mut out, set);
    render_parse_table(&mut out, set, &variants);
    render_prefix_parsers(&mut out, set, &variants);
    render_class_table(&mut out, set, &variants);

    out
}

/// UpperCamel identifier for an opcode name: `i32.load8_u` → `I32Load8U`
pub fn to_upper_camel(name: &str) -> String {
    let mut ident: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    if !ident.starts_with(|c: char| c.is_ascii_alphabetic()) {
        ident.insert_str(0, "Op");
    }
    ident
}

/// One unique variant name per opcode, indexed by id
fn variant_names(set: &InstructionSet) -> Vec<String> {
    // `Basic` and `Mem` name the class variants; `Self` is a keyword.
    let mut taken: HashSet<String> = ["Basic", "Mem", "Self"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    set.enumeration()
        .ids()
        .map(|id| {
            let base = to_upper_camel(set.name(id));
            let mut ident = base.clone();
            let mut suffix = u32::from(id.as_u16());
            while taken.contains(&ident) {
                ident = format!("{}{}", base, suffix);
                suffix += 1;
            }
            taken.insert(ident.clone());
            ident
        })
        .collect()
}

fn variant(variants: &[String], id: OpcodeId) -> &str {
    &variants[id.index()]
}

fn render_opcode_enum(out: &mut String, variants: &[String]) {
    out.push_str("#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]\n");
    out.push_str("#[repr(u16)]\n");
    out.push_str("pub enum Opcode {\n");
    for name in variants {
        out.push_str(&format!("    {},\n", name));
    }
    out.push_str("}\n\n");
    out.push_str(&format!("pub const NUM_OPCODES: usize = {};\n\n", variants.len()));
}

fn render_prefix_enum(out: &mut String, set: &InstructionSet) {
    let tables = set.dispatch().prefix_tables();
    out.push_str("#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]\n");
    // repr is rejected on an enum without variants
    if !tables.is_empty() {
        out.push_str("#[repr(u8)]\n");
    }
    out.push_str("pub enum Prefix {\n");
    for table in tables {
        out.push_str(&format!("    X{:02x},\n", table.prefix()));
    }
    out.push_str("}\n\n");
}

fn render_parse_table(out: &mut String, set: &InstructionSet, variants: &[String]) {
    out.push_str("#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]\n");
    out.push_str("pub enum ParseResult {\n");
    out.push_str("    Opcode(Opcode),\n");
    out.push_str("    Prefix(Prefix),\n");
    out.push_str("    Invalid,\n");
    out.push_str("}\n\n");

    out.push_str("pub const PARSE: [ParseResult; 256] = [\n");
    for (byte, entry) in set.dispatch().entries().iter().enumerate() {
        let line = match entry {
            DispatchEntry::Opcode(id) => format!("ParseResult::Opcode(Opcode::{})", variant(variants, *id)),
            DispatchEntry::Prefix(_) => format!("ParseResult::Prefix(Prefix::X{:02x})", byte),
            DispatchEntry::Invalid => "ParseResult::Invalid".to_string(),
        };
        out.push_str(&format!("    {}, // {:#04x}\n", line, byte));
    }
    out.push_str("];\n\n");
}

fn render_prefix_parsers(out: &mut String, set: &InstructionSet, variants: &[String]) {
    let tables = set.dispatch().prefix_tables();
    for table in tables {
        out.push_str("#[inline]\n");
        out.push_str(&format!("fn parse_x{:02x}(suffix: u32) -> Option<Opcode> {{\n", table.prefix()));
        out.push_str("    Some(match suffix {\n");
        for (suffix, id) in table.iter() {
            out.push_str(&format!("        {} => Opcode::{},\n", suffix, variant(variants, id)));
        }
        out.push_str("        _ => return None,\n");
        out.push_str("    })\n");
        out.push_str("}\n\n");
    }

    out.push_str("#[inline]\n");
    out.push_str("pub fn parse_prefixed(prefix: Prefix, suffix: u32) -> Option<Opcode> {\n");
    if tables.is_empty() {
        out.push_str("    let _ = suffix;\n");
    }
    out.push_str("    match prefix {\n");
    for table in tables {
        out.push_str(&format!(
            "        Prefix::X{:02x} => parse_x{:02x}(suffix),\n",
            table.prefix(),
            table.prefix()
        ));
    }
    out.push_str("    }\n");
    out.push_str("}\n\n");
}

fn render_class_table(out: &mut String, set: &InstructionSet, variants: &[String]) {
    out.push_str("#[derive(Clone, Copy, Debug, PartialEq, Eq)]\n");
    out.push_str("pub enum OpcodeClass {\n");
    out.push_str("    Basic { pop: &'static [ValueType], push: &'static [ValueType] },\n");
    out.push_str("    Mem { max_align: u8, pop: &'static [ValueType], push: &'static [ValueType] },\n");
    for (id, class) in set.enumeration().ids().zip(set.classes()) {
        if class.is_special() {
            out.push_str(&format!("    {},\n", variant(variants, id)));
        }
    }
    out.push_str("}\n\n");

    out.push_str("pub const CLASS: [OpcodeClass; NUM_OPCODES] = [\n");
    for class in set.classes() {
        let line = match class {
            OpcodeClass::Basic { pop, push } => format!(
                "OpcodeClass::Basic {{ pop: {}, push: {} }}",
                type_slice(pop),
                type_slice(push)
            ),
            OpcodeClass::Memory { max_align, pop, push } => format!(
                "OpcodeClass::Mem {{ max_align: {}, pop: {}, push: {} }}",
                max_align,
                type_slice(pop),
                type_slice(push)
            ),
            OpcodeClass::Special(id) => format!("OpcodeClass::{}", variant(variants, *id)),
        };
        out.push_str(&format!("    {},\n", line));
    }
    out.push_str("];\n");
}

fn type_slice(types: &[ValueType]) -> String {
    let items: Vec<String> = types
        .iter()
        .map(|ty| format!("ValueType::{}", ty.variant()))
        .collect();
    format!("&[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("i32.add", "I32Add")]
    #[case("i32.load8_u", "I32Load8U")]
    #[case("i64.extend32_s", "I64Extend32S")]
    #[case("memory.size", "MemorySize")]
    #[case("nop", "Nop")]
    #[case("8bit", "Op8bit")]
    fn test_to_upper_camel(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(to_upper_camel(name), expected);
    }
}

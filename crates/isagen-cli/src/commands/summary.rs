//! Summary command - counts and dispatch map of a compiled specification

use anyhow::Result;
use isagen_tables::{DispatchEntry, InstructionSet, OpcodeClass, OpcodeId};
use std::fmt::Write;
use std::path::PathBuf;

pub fn run(spec: Option<PathBuf>) -> Result<()> {
    let config = super::load_config()?;
    let path = super::resolve_spec(spec, &config)?;
    let set = super::compile(&path)?;

    println!("{}", path.display());
    print!("{}", format_summary(&set));
    Ok(())
}

fn class_tag(class: &OpcodeClass) -> &'static str {
    match class {
        OpcodeClass::Basic { .. } => "basic",
        OpcodeClass::Memory { .. } => "memory",
        OpcodeClass::Special(_) => "special",
    }
}

fn opcode_line(out: &mut String, indent: &str, code: String, set: &InstructionSet, id: OpcodeId) {
    let _ = writeln!(
        out,
        "{}{:<6}{:<28}{}",
        indent,
        code,
        set.name(id),
        class_tag(set.class(id))
    );
}

/// Counts followed by every assigned byte, prefixed suffixes nested below
/// their prefix byte
pub fn format_summary(set: &InstructionSet) -> String {
    let dispatch = set.dispatch();
    let counts = set.class_counts();
    let invalid = dispatch
        .entries()
        .iter()
        .filter(|entry| matches!(entry, DispatchEntry::Invalid))
        .count();

    let mut out = String::new();
    let _ = writeln!(out, "  opcodes:  {}", set.len());
    let _ = writeln!(out, "  prefixes: {}", dispatch.prefix_tables().len());
    let _ = writeln!(out, "  basic:    {}", counts.basic);
    let _ = writeln!(out, "  memory:   {}", counts.memory);
    let _ = writeln!(out, "  special:  {}", counts.special);
    let _ = writeln!(out, "  unassigned bytes: {}", invalid);
    out.push_str("\ndispatch:\n");

    for (byte, entry) in dispatch.entries().iter().enumerate() {
        match *entry {
            DispatchEntry::Opcode(id) => {
                opcode_line(&mut out, "  ", format!("{:#04x}", byte), set, id);
            }
            DispatchEntry::Prefix(prefix) => {
                let Some(table) = dispatch.prefix_table(prefix) else {
                    continue;
                };
                let _ = writeln!(out, "  {:#04x}  prefix ({} opcodes)", byte, table.len());
                for (suffix, id) in table.iter() {
                    opcode_line(&mut out, "    ", suffix.to_string(), set, id);
                }
            }
            DispatchEntry::Invalid => {}
        }
    }
    out
}

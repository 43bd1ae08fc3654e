//! Check command - compile a specification without producing output

use anyhow::Result;
use std::path::PathBuf;

/// Compile the specification and report success
///
/// Compilation stops at the first violated invariant, which becomes the
/// command's error.
pub fn run(spec: Option<PathBuf>) -> Result<()> {
    let config = super::load_config()?;
    let path = super::resolve_spec(spec, &config)?;
    let set = super::compile(&path)?;

    println!(
        "{}: {} opcodes, no errors found",
        path.display(),
        set.len()
    );
    Ok(())
}

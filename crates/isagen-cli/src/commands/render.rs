//! Render command - emit compiled tables as Rust source

use anyhow::{Context, Result};
use isagen_tables::{render_rust, RenderOptions};
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub struct RenderArgs {
    pub spec: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_header: bool,
    pub value_type_path: String,
}

/// Render to the requested file, the configured one, or stdout
pub fn run(args: RenderArgs) -> Result<()> {
    let config = super::load_config()?;
    let path = super::resolve_spec(args.spec, &config)?;
    let set = super::compile(&path)?;

    let options = RenderOptions {
        header: !args.no_header && config.project.module_doc(),
        value_type_path: args.value_type_path,
    };
    let source = render_rust(&set, &options);

    match args.output.or_else(|| config.output_path()) {
        Some(output) => {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(&output, source)
                .with_context(|| format!("Failed to write output file: {}", output.display()))?;
            info!(output = %output.display(), opcodes = set.len(), "tables rendered");
            println!("Rendered {} opcodes to {}", set.len(), output.display());
        }
        None => print!("{}", source),
    }
    Ok(())
}

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Bytecode table generator for stack-machine instruction sets.
///
/// Compiles a TOML instruction-set specification into an opcode
/// enumeration, a byte-level dispatch table and per-opcode stack-effect
/// classes, then checks, summarizes or renders them as Rust source.
///
/// EXAMPLES:
///     isagen check specs/wasm-core.toml        Validate a specification
///     isagen summary specs/wasm-core.toml      Print counts and the dispatch map
///     isagen render -o src/opcodes.rs          Render using isagen.toml defaults
///
/// ENVIRONMENT VARIABLES:
///     ISAGEN_SPEC       Default specification path
///     ISAGEN_OUTPUT     Default output path for `render`
///     ISAGEN_LOG        Log filter (e.g. 'debug', 'isagen_tables=trace')
#[derive(Parser)]
#[command(name = "isagen")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Log compiler passes to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a specification and report the first violated invariant
    ///
    /// EXAMPLES:
    ///     isagen check specs/wasm-core.toml
    ///     isagen check                        Use the spec from isagen.toml
    #[command(visible_alias = "c")]
    Check {
        /// Path to the specification (defaults to isagen.toml's generator.spec)
        spec: Option<PathBuf>,
    },

    /// Print opcode, prefix and class counts followed by the dispatch map
    #[command(visible_alias = "s")]
    Summary {
        /// Path to the specification (defaults to isagen.toml's generator.spec)
        spec: Option<PathBuf>,
    },

    /// Render the compiled tables as a Rust module
    ///
    /// Writes to stdout unless an output path is given on the command line
    /// or in isagen.toml.
    ///
    /// EXAMPLES:
    ///     isagen render specs/wasm-core.toml > opcodes.rs
    ///     isagen render specs/wasm-core.toml -o src/opcodes.rs
    #[command(visible_alias = "r")]
    Render {
        /// Path to the specification (defaults to isagen.toml's generator.spec)
        spec: Option<PathBuf>,
        /// Output file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Leave out the "generated, do not edit" header
        #[arg(long)]
        no_header: bool,
        /// Path the generated module imports `ValueType` from
        #[arg(long, default_value = "isagen_tables::ValueType")]
        value_type_path: String,
    },

    /// Generate shell completion scripts
    ///
    /// EXAMPLES:
    ///     isagen completions bash > ~/.local/share/bash-completion/completions/isagen
    ///     isagen completions zsh > ~/.zfunc/_isagen
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("ISAGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { spec } => commands::check::run(spec),
        Commands::Summary { spec } => commands::summary::run(spec),
        Commands::Render {
            spec,
            output,
            no_header,
            value_type_path,
        } => commands::render::run(commands::render::RenderArgs {
            spec,
            output,
            no_header,
            value_type_path,
        }),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
            Ok(())
        }
    }
}

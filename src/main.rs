//! The Spyre compiler CLI.
//!
//! ```text
//! spyre build <FILE> [-o <OUTPUT>]   # compile FILE, write the bytecode listing
//! spyre check <FILE>                 # compile FILE, report diagnostics, discard output
//! ```
//!
//! There is no linking or execution step: Spyre's output is a textual
//! bytecode listing for a separate VM, not a native binary.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spyre")]
#[command(about = "The Spyre programming language compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Spyre source file into a bytecode listing.
    Build {
        /// The source file to compile (e.g. `hello.spy`).
        file: PathBuf,
        /// Output path for the bytecode listing. Defaults to `file` with
        /// its extension replaced by `.asm`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the full pipeline and report diagnostics, discarding the output.
    Check {
        /// The source file to check (e.g. `hello.spy`).
        file: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("asm")
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { file, output } => {
            let output = output.unwrap_or_else(|| default_output_path(&file));
            run_build(&file, &output)
        }
        Commands::Check { file } => run_check(&file),
    }
}

fn run_build(input: &Path, output: &Path) -> ExitCode {
    tracing::info!(input = %input.display(), output = %output.display(), "compiling");
    match spyre::compile(input, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_and_fail(input, &e),
    }
}

fn run_check(input: &Path) -> ExitCode {
    tracing::info!(input = %input.display(), "checking");
    let source = match std::fs::read_to_string(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("couldn't read input file '{}': {e}", input.display());
            return ExitCode::FAILURE;
        }
    };
    match spyre::check(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            spyre::diagnostics::report_error(&input.display().to_string(), &source, &e);
            ExitCode::FAILURE
        }
    }
}

/// Re-reads the source (best-effort) so a pretty `ariadne` report can be
/// rendered even though [`spyre::compile`] only returns the error, not the
/// source text — matching the "couldn't open output file" wording when the
/// failure is an I/O error rather than a source diagnostic.
fn report_and_fail(input: &Path, error: &spyre::CompileError) -> ExitCode {
    match std::fs::read_to_string(input) {
        Ok(source) => {
            spyre::diagnostics::report_error(&input.display().to_string(), &source, error)
        }
        Err(_) => eprintln!("{error}"),
    }
    ExitCode::FAILURE
}

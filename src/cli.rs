//! Command-line driver: argument parsing and pipeline orchestration.

use std::path::PathBuf;

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use tracing::debug;

use crate::commit::{CommitMessage, collect_staged, extract_signals, synthesize};
use crate::config::RunConfig;
use crate::error::CliError;

/// Suggest a commit message from the staged changes of a git repository.
#[derive(Parser, Debug)]
#[command(name = "magic-commit")]
#[command(about = "Suggest a commit message from the staged changes of a git repository")]
#[command(version)]
pub struct Cli {
    /// Skip the loading phase (no model is loaded; accepted for editor integrations)
    #[arg(long)]
    pub no_load: bool,

    /// Git repository directory (defaults to the current directory)
    #[arg(short, long, env = "MAGIC_COMMIT_DIR")]
    pub directory: Option<PathBuf>,

    /// Start of the commit message; replaces the generated subject
    #[arg(short, long)]
    pub start: Option<String>,

    /// Issue number to close in the commit message
    #[arg(short, long)]
    pub ticket: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Convert a clap parse failure into a single-line [`CliError`].
///
/// Unrecognized flags become [`CliError::UnknownFlag`]; everything else,
/// stray positional arguments included, is a usage error carrying the first
/// line of clap's message.
pub fn usage_error(err: clap::Error) -> CliError {
    if err.kind() == ErrorKind::UnknownArgument {
        if let Some(ContextValue::String(flag)) = err.get(ContextKind::InvalidArg) {
            if flag.starts_with('-') {
                return CliError::UnknownFlag(flag.clone());
            }
        }
    }

    let rendered = err.to_string();
    let line = rendered
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("invalid arguments");
    CliError::Usage(line.trim_start_matches("error: ").to_string())
}

/// Run the pipeline: collect staged changes, extract signals, synthesize.
///
/// Nothing is written here; the caller prints the message only after the
/// whole pipeline has succeeded.
pub fn run(config: &RunConfig) -> Result<CommitMessage, CliError> {
    if config.no_load {
        debug!("--no-load set, skipping loading phase");
    }

    debug!("Inspecting staged changes in {}", config.directory.display());
    let records = collect_staged(&config.directory)?;
    let signals = extract_signals(&records);

    Ok(synthesize(&signals, &config.synthesis_options()))
}

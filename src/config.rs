//! Resolved run configuration.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::commit::SynthesisOptions;

/// Environment variable holding the log filter (`tracing_subscriber::EnvFilter` syntax).
pub const LOG_ENV_VAR: &str = "MAGIC_COMMIT_LOG";

/// Configuration for a single run, resolved from command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Absolute path to inspect; the repository is discovered from here.
    pub directory: PathBuf,
    pub start: Option<String>,
    pub ticket: Option<u64>,
    pub no_load: bool,
    pub verbose: bool,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Self {
        let directory = cli.directory.unwrap_or_else(|| PathBuf::from("."));
        let directory = expand_tilde(&directory);
        let directory = std::path::absolute(&directory).unwrap_or(directory);

        let start = cli
            .start
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            directory,
            start,
            ticket: cli.ticket,
            no_load: cli.no_load,
            verbose: cli.verbose,
        }
    }

    /// Default log filter when `MAGIC_COMMIT_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            start: self.start.clone(),
            ticket: self.ticket,
        }
    }
}

/// Expand a leading `~` component to the home directory.
///
/// Paths are returned unchanged when there is no leading `~` or no home
/// directory can be determined.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

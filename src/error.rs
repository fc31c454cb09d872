//! Error types for magic-commit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for precondition failures (not a repository, nothing staged).
pub const EXIT_PRECONDITION: i32 = 1;

/// Exit code for usage errors and unexpected internal failures.
pub const EXIT_FAILURE: i32 = 2;

/// Errors from reading the staging area.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("no staged changes")]
    NoStagedChanges,

    #[error("failed to read staged changes: {}", .0.message())]
    Internal(#[source] git2::Error),
}

/// Errors surfaced by the command-line driver.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Collect(#[from] CollectError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Collect(CollectError::NotARepository(_))
            | CliError::Collect(CollectError::NoStagedChanges) => EXIT_PRECONDITION,
            CliError::Collect(CollectError::Internal(_)) => EXIT_FAILURE,
            CliError::UnknownFlag(_) | CliError::Usage(_) => EXIT_FAILURE,
        }
    }
}

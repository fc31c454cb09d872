//! magic-commit - A CLI tool that suggests a commit message from staged changes.
//!
//! # Overview
//!
//! magic-commit reads the git staging area, classifies each staged file by
//! path and touched symbol, and synthesizes a single commit message from
//! deterministic templates. No network or model is involved, so the same
//! staged changes always produce the same message.

pub mod cli;
pub mod commit;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use commit::{Category, ChangeKind, ChangeRecord, CommitMessage, FileSignal, SynthesisOptions};
pub use config::RunConfig;
pub use error::{CliError, CollectError};

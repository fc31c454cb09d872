//! Commit message suggestion from staged changes.

pub mod diff;
pub mod message;
pub mod signal;
pub mod symbol;

pub use diff::{ChangeKind, ChangeRecord, HunkLine, HunkSummary, LineOrigin, collect_staged, collect_staged_from_repo, open_repository};
pub use message::{CommitMessage, MAX_SUBJECT_LENGTH, SynthesisOptions, majority_category, synthesize};
pub use signal::{Category, FileSignal, categorize, extract_signals};
pub use symbol::dominant_symbol;

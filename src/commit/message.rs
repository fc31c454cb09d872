//! Deterministic commit message synthesis from file signals.

use tracing::debug;

use crate::commit::diff::ChangeKind;
use crate::commit::signal::{Category, FileSignal, category_counts, path_stem, strip_test_affixes};

/// Maximum subject length in characters.
pub const MAX_SUBJECT_LENGTH: usize = 72;

/// Maximum number of symbols listed in the body.
pub const MAX_LISTED_SYMBOLS: usize = 3;

const ELLIPSIS: &str = "...";

/// A synthesized commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub subject: String,
    pub body: Option<String>,
}

impl CommitMessage {
    /// Format the commit message for output.
    ///
    /// Produces the subject, then a blank line and the body when one exists:
    /// ```text
    /// update parse_config
    ///
    /// src/config.py: parse_config
    /// src/loader.py: load
    /// ```
    pub fn format(&self) -> String {
        match self.body.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            Some(body) => format!("{}\n\n{}", self.subject, body),
            None => self.subject.clone(),
        }
    }
}

/// Caller-provided adjustments to the synthesized message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Replaces the generated subject when set.
    pub start: Option<String>,
    /// Issue number appended to the body as `Closes #<n>`.
    pub ticket: Option<u64>,
}

/// Synthesize a commit message from signals in collector order.
///
/// `signals` must be non-empty; the collector rejects empty staging areas
/// before synthesis runs.
pub fn synthesize(signals: &[FileSignal<'_>], options: &SynthesisOptions) -> CommitMessage {
    let majority = majority_category(signals);

    let subject = match options.start.as_deref().map(str::trim) {
        Some(start) if !start.is_empty() => start.to_string(),
        _ => subject_for(majority, signals),
    };

    let mut body_lines = symbol_lines(signals);
    if let Some(ticket) = options.ticket {
        if !body_lines.is_empty() {
            body_lines.push(String::new());
        }
        body_lines.push(format!("Closes #{ticket}"));
    }

    debug!(
        "Synthesized message: majority={}, {} file(s), {} body line(s)",
        majority,
        signals.len(),
        body_lines.len()
    );

    CommitMessage {
        subject: truncate_subject(&subject),
        body: (!body_lines.is_empty()).then(|| body_lines.join("\n")),
    }
}

/// Most frequent category; ties go to the earliest declared category.
pub fn majority_category(signals: &[FileSignal<'_>]) -> Category {
    let counts = category_counts(signals);
    let mut best = Category::Other;
    let mut best_count = 0usize;

    for category in Category::ALL {
        let count = counts[category.index()];
        if count > best_count {
            best = category;
            best_count = count;
        }
    }

    best
}

/// Build the subject for the majority category.
fn subject_for(majority: Category, signals: &[FileSignal<'_>]) -> String {
    let in_majority: Vec<&FileSignal<'_>> = signals
        .iter()
        .filter(|s| s.category == majority)
        .collect();

    let Some(lead) = in_majority
        .iter()
        .find(|s| s.dominant_symbol.is_some())
        .or_else(|| in_majority.first())
    else {
        return "update files".to_string();
    };

    match majority {
        Category::Docs => "update documentation".to_string(),
        Category::Config => "update configuration files".to_string(),
        Category::Build => "update build files".to_string(),
        Category::Test => {
            let stem = path_stem(lead.record.path());
            format!("add/update tests for {}", strip_test_affixes(stem))
        }
        Category::Source | Category::Other => {
            if let (Some(from), None) = (lead.record.rename_from(), &lead.dominant_symbol) {
                return format!(
                    "rename {} to {}",
                    path_stem(from),
                    path_stem(lead.record.path())
                );
            }

            let target = lead
                .dominant_symbol
                .as_deref()
                .unwrap_or_else(|| path_stem(lead.record.path()));
            format!("{} {}", verb_for(&in_majority), target)
        }
    }
}

/// `add` or `remove` when every signal shares that kind, otherwise `update`.
fn verb_for(signals: &[&FileSignal<'_>]) -> &'static str {
    let kinds = || signals.iter().map(|s| s.record.kind());

    if kinds().all(|k| k == ChangeKind::Added) {
        "add"
    } else if kinds().all(|k| k == ChangeKind::Deleted) {
        "remove"
    } else {
        "update"
    }
}

/// Body lines listing dominant symbols, only when more than one file has one.
fn symbol_lines(signals: &[FileSignal<'_>]) -> Vec<String> {
    let with_symbols: Vec<(&str, &str)> = signals
        .iter()
        .filter_map(|s| {
            s.dominant_symbol
                .as_deref()
                .map(|symbol| (s.record.path(), symbol))
        })
        .collect();

    if with_symbols.len() <= 1 {
        return Vec::new();
    }

    let mut lines: Vec<String> = with_symbols
        .iter()
        .take(MAX_LISTED_SYMBOLS)
        .map(|(path, symbol)| format!("{path}: {symbol}"))
        .collect();

    let remaining = with_symbols.len().saturating_sub(MAX_LISTED_SYMBOLS);
    if remaining > 0 {
        lines.push(format!("and {remaining} more"));
    }

    lines
}

/// Truncate a subject to [`MAX_SUBJECT_LENGTH`] characters, marking the cut with `...`.
///
/// Only the first line is kept; counting is by `char` so multi-byte text is
/// never split.
pub fn truncate_subject(subject: &str) -> String {
    let subject = subject.lines().next().unwrap_or("").trim_end();

    if subject.chars().count() <= MAX_SUBJECT_LENGTH {
        return subject.to_string();
    }

    let keep = MAX_SUBJECT_LENGTH - ELLIPSIS.len();
    let mut truncated: String = subject.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

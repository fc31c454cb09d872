//! Staged change collection from the index using git2.

use std::fmt;
use std::path::Path;

use git2::{Delta, Diff, DiffFindOptions, DiffOptions, ErrorCode, Patch, Repository, Tree};
use tracing::debug;

use crate::error::CollectError;

/// Maximum number of added/removed line texts kept per file.
///
/// Line counts are always exact; only the captured text is capped.
pub const MAX_HUNK_LINES: usize = 2_000;

/// Kind of a staged change.
///
/// Declaration order is the tie-break order when two records share a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "Added"),
            ChangeKind::Modified => write!(f, "Modified"),
            ChangeKind::Deleted => write!(f, "Deleted"),
            ChangeKind::Renamed => write!(f, "Renamed"),
        }
    }
}

/// Which side of the diff a hunk line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Context,
    Added,
    Removed,
}

/// One line of a hunk, without its origin marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkLine {
    pub origin: LineOrigin,
    pub text: String,
}

impl HunkLine {
    pub fn new(origin: LineOrigin, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
        }
    }
}

/// Summary of a single diff hunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HunkSummary {
    /// Function context from the hunk header (text after the second `@@`).
    pub context: Option<String>,
    /// Hunk lines in diff order, unchanged lines included.
    pub lines: Vec<HunkLine>,
}

impl HunkSummary {
    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.lines_from(LineOrigin::Added)
    }

    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.lines_from(LineOrigin::Removed)
    }

    fn lines_from(&self, origin: LineOrigin) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |l| l.origin == origin)
            .map(|l| l.text.as_str())
    }
}

/// A single file's staged change.
///
/// Fields are private so that `rename_from` is present exactly when the
/// kind is [`ChangeKind::Renamed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    path: String,
    kind: ChangeKind,
    lines_added: usize,
    lines_removed: usize,
    rename_from: Option<String>,
    hunks: Vec<HunkSummary>,
}

impl ChangeRecord {
    fn new(path: String, kind: ChangeKind, rename_from: Option<String>) -> Self {
        Self {
            path,
            kind,
            lines_added: 0,
            lines_removed: 0,
            rename_from,
            hunks: Vec::new(),
        }
    }

    pub fn added(path: impl Into<String>) -> Self {
        Self::new(path.into(), ChangeKind::Added, None)
    }

    pub fn modified(path: impl Into<String>) -> Self {
        Self::new(path.into(), ChangeKind::Modified, None)
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self::new(path.into(), ChangeKind::Deleted, None)
    }

    pub fn renamed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(to.into(), ChangeKind::Renamed, Some(from.into()))
    }

    pub fn with_line_counts(mut self, added: usize, removed: usize) -> Self {
        self.lines_added = added;
        self.lines_removed = removed;
        self
    }

    pub fn with_hunks(mut self, hunks: Vec<HunkSummary>) -> Self {
        self.hunks = hunks;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn lines_added(&self) -> usize {
        self.lines_added
    }

    pub fn lines_removed(&self) -> usize {
        self.lines_removed
    }

    /// Previous path; `Some` iff this is a rename.
    pub fn rename_from(&self) -> Option<&str> {
        self.rename_from.as_deref()
    }

    pub fn hunks(&self) -> &[HunkSummary] {
        &self.hunks
    }
}

/// Open the repository containing `path`.
///
/// Discovery walks up from `path` the way `git` itself does. Bare
/// repositories have nothing to stage from and are rejected too.
pub fn open_repository(path: &Path) -> Result<Repository, CollectError> {
    let repo = Repository::discover(path).map_err(|e| match e.code() {
        ErrorCode::NotFound => CollectError::NotARepository(path.to_path_buf()),
        _ => CollectError::Internal(e),
    })?;

    if repo.is_bare() {
        return Err(CollectError::NotARepository(path.to_path_buf()));
    }

    Ok(repo)
}

/// Collect the staged changes of the repository containing `path`.
pub fn collect_staged(path: &Path) -> Result<Vec<ChangeRecord>, CollectError> {
    let repo = open_repository(path)?;
    collect_staged_from_repo(&repo)
}

/// Collect the staged changes (HEAD tree vs. index) of an open repository.
///
/// Records are sorted by path, ties broken by [`ChangeKind`] order.
/// Returns [`CollectError::NoStagedChanges`] when the index matches HEAD.
pub fn collect_staged_from_repo(repo: &Repository) -> Result<Vec<ChangeRecord>, CollectError> {
    let head_tree = resolve_head_tree(repo)?;

    let mut opts = DiffOptions::new();
    let mut diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
        .map_err(CollectError::Internal)?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(CollectError::Internal)?;

    let mut records = Vec::with_capacity(diff.deltas().len());
    for delta_idx in 0..diff.deltas().len() {
        if let Some(record) = record_from_delta(&diff, delta_idx)? {
            records.push(record);
        }
    }

    if records.is_empty() {
        return Err(CollectError::NoStagedChanges);
    }

    records.sort_by(|a, b| a.path.cmp(&b.path).then(a.kind.cmp(&b.kind)));

    debug!(
        "Collected {} staged change(s): {}",
        records.len(),
        records
            .iter()
            .map(|r| format!("{} ({})", r.path, r.kind))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(records)
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// so the whole index is diffed against the empty tree.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, CollectError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(CollectError::Internal(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(CollectError::Internal)?;
    Ok(Some(tree))
}

/// Build a record for one delta, or `None` for entries that are not changes.
fn record_from_delta(diff: &Diff<'_>, delta_idx: usize) -> Result<Option<ChangeRecord>, CollectError> {
    let Some(delta) = diff.get_delta(delta_idx) else {
        return Ok(None);
    };

    let new_path = delta
        .new_file()
        .path()
        .map(|p| p.to_string_lossy().to_string());
    let old_path = delta
        .old_file()
        .path()
        .map(|p| p.to_string_lossy().to_string());

    let record = match delta.status() {
        Delta::Unmodified | Delta::Ignored | Delta::Untracked => return Ok(None),
        Delta::Added | Delta::Copied => new_path.map(ChangeRecord::added),
        Delta::Deleted => old_path.map(ChangeRecord::deleted),
        Delta::Renamed => match (old_path, new_path) {
            (Some(from), Some(to)) => Some(ChangeRecord::renamed(from, to)),
            (from, to) => to.or(from).map(ChangeRecord::modified),
        },
        _ => new_path.or(old_path).map(ChangeRecord::modified),
    };

    let Some(record) = record.filter(|r| !r.path.is_empty()) else {
        return Ok(None);
    };

    // Binary and content-less entries have no patch.
    let record = match Patch::from_diff(diff, delta_idx).map_err(CollectError::Internal)? {
        Some(patch) => {
            let (added, removed, hunks) = summarize_patch(&patch)?;
            record.with_line_counts(added, removed).with_hunks(hunks)
        }
        None => record,
    };

    Ok(Some(record))
}

/// Line counts and hunk summaries for one file's patch.
fn summarize_patch(patch: &Patch<'_>) -> Result<(usize, usize, Vec<HunkSummary>), CollectError> {
    let (_, additions, deletions) = patch.line_stats().map_err(CollectError::Internal)?;

    let mut hunks = Vec::with_capacity(patch.num_hunks());
    let mut captured = 0usize;

    for hunk_idx in 0..patch.num_hunks() {
        let (hunk, line_count) = patch.hunk(hunk_idx).map_err(CollectError::Internal)?;
        let mut summary = HunkSummary {
            context: hunk_context(hunk.header()),
            ..Default::default()
        };

        for line_idx in 0..line_count {
            if captured >= MAX_HUNK_LINES {
                break;
            }

            let line = patch
                .line_in_hunk(hunk_idx, line_idx)
                .map_err(CollectError::Internal)?;
            let text = String::from_utf8_lossy(line.content())
                .trim_end_matches(['\r', '\n'])
                .to_string();

            let origin = match line.origin() {
                '+' => LineOrigin::Added,
                '-' => LineOrigin::Removed,
                ' ' => LineOrigin::Context,
                _ => continue,
            };
            if origin != LineOrigin::Context {
                captured += 1;
            }
            summary.lines.push(HunkLine { origin, text });
        }

        hunks.push(summary);
    }

    Ok((additions, deletions, hunks))
}

/// Extract the function context from a hunk header like `@@ -1,3 +1,4 @@ fn main()`.
fn hunk_context(header: &[u8]) -> Option<String> {
    let header = String::from_utf8_lossy(header);
    let rest = header.strip_prefix("@@")?;
    let (_, context) = rest.split_once("@@")?;
    let context = context.trim();

    (!context.is_empty()).then(|| context.to_string())
}

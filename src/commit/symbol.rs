//! Function and type name detection in diff hunks.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::commit::diff::{HunkSummary, LineOrigin};

/// Definition patterns, each capturing the defined name as `name`.
const DEFINITION_PATTERNS: &[&str] = &[
    // Rust
    r#"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:default\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+"[^"]*"\s+)?fn\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)"#,
    r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|trait|union|type)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)",
    // Python
    r"^\s*(?:async\s+)?def\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\(",
    r"^\s*class\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*[(:]",
    // JavaScript / TypeScript
    r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)",
    r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)",
    r"^\s*(?:export\s+)?(?:interface|type)\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)",
    r"^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?:async\s+)?(?:\([^)]*\)|[A-Za-z_$][A-Za-z0-9_$]*)\s*=>",
    // Go
    r"^func\s+(?:\([^)]*\)\s*)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*[(\[]",
    r"^type\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s+(?:struct|interface)\b",
    // Ruby
    r"^\s*def\s+(?:self\.)?(?P<name>[A-Za-z_][A-Za-z0-9_]*[?!]?)",
    r"^\s*(?:class|module)\s+(?P<name>[A-Z][A-Za-z0-9_]*)",
    // Swift / Kotlin
    r"^\s*(?:(?:public|private|internal|open|fileprivate|override|static)\s+)*(?:func|fun)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)",
    // Java / C# / Kotlin types
    r"^\s*(?:(?:public|private|protected|internal|static|final|abstract|sealed|partial|data)\s+)*(?:class|interface|enum|record|object)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)",
    // Java / C# methods
    r"^\s*(?:(?:public|private|protected|internal|static|final|abstract|synchronized|override|virtual|async)\s+)+[A-Za-z_][A-Za-z0-9_<>,\[\]\s]*\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\([^;]*$",
    // C / C++ function definitions starting at column 0; the return type must
    // be a builtin, a `_t` alias, a qualified or tagged type, or a pointer
    r"^(?:(?:static|inline|extern|const|constexpr|virtual|explicit|unsigned|signed|long|short)\s+)*(?:(?:void|bool|char|short|int|long|float|double|size_t|auto|[A-Za-z_][A-Za-z0-9_]*_t|[A-Za-z_][A-Za-z0-9_]*(?:::[A-Za-z_][A-Za-z0-9_]*)+|(?:struct|enum|union)\s+[A-Za-z_][A-Za-z0-9_]*)(?:\s*<[^>]*>)?[\s\*&]+|[A-Za-z_][A-Za-z0-9_]*(?:\s*<[^>]*>)?\s*[\*&]+\s*)(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\([^;]*$",
    // C++ out-of-class member definitions
    r"^(?:[A-Za-z_][A-Za-z0-9_:<>]*[\s\*&]+)*(?P<name>[A-Za-z_][A-Za-z0-9_]*::~?[A-Za-z_][A-Za-z0-9_]*)\s*\([^;]*$",
];

/// Words that the C-like pattern can mistake for a function name.
const NON_SYMBOLS: &[&str] = &[
    "if", "for", "while", "switch", "return", "sizeof", "catch", "else", "new", "delete",
];

fn definition_regexes() -> &'static [Regex] {
    static REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    REGEXES.get_or_init(|| {
        DEFINITION_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("Invalid regex"))
            .collect()
    })
}

/// Name of the function or type defined on `line`, if any.
pub fn definition_name(line: &str) -> Option<String> {
    definition_regexes().iter().find_map(|re| {
        let name = re.captures(line)?.name("name")?.as_str();
        (!NON_SYMBOLS.contains(&name)).then(|| name.to_string())
    })
}

/// The single function or type name touched by these hunks, if unambiguous.
///
/// Names are gathered in tiers and the first non-empty tier decides:
///
/// 1. definitions on added lines;
/// 2. the enclosing definition of each changed line: the nearest definition
///    above it in the hunk, else the hunk header context;
/// 3. definitions on removed lines.
///
/// `None` when the deciding tier holds several distinct names, or when no
/// tier holds any.
pub fn dominant_symbol(hunks: &[HunkSummary]) -> Option<String> {
    let added: BTreeSet<String> = hunks
        .iter()
        .flat_map(HunkSummary::added)
        .filter_map(definition_name)
        .collect();

    let enclosing: BTreeSet<String> = hunks.iter().flat_map(enclosing_definitions).collect();

    let removed: BTreeSet<String> = hunks
        .iter()
        .flat_map(HunkSummary::removed)
        .filter_map(definition_name)
        .collect();

    let mut names = [added, enclosing, removed]
        .into_iter()
        .find(|tier| !tier.is_empty())?;

    if names.len() == 1 {
        names.pop_first()
    } else {
        None
    }
}

/// Definitions enclosing the non-blank changed lines of one hunk.
///
/// The header context only names the function above the hunk start, so any
/// definition among the hunk's own lines replaces it. Lines following a
/// removed definition belong to that definition and are skipped.
fn enclosing_definitions(hunk: &HunkSummary) -> Vec<String> {
    let mut current = hunk.context.as_deref().and_then(definition_name);
    let mut in_removed_definition = false;
    let mut names = Vec::new();

    for line in &hunk.lines {
        let defined = definition_name(&line.text);
        match line.origin {
            LineOrigin::Context => {
                in_removed_definition = false;
                if defined.is_some() {
                    current = defined;
                }
            }
            LineOrigin::Removed if defined.is_some() => in_removed_definition = true,
            LineOrigin::Added if defined.is_some() => {
                in_removed_definition = false;
                current = defined;
            }
            LineOrigin::Removed if in_removed_definition => {}
            LineOrigin::Added | LineOrigin::Removed => {
                if !line.text.trim().is_empty() {
                    names.extend(current.clone());
                }
            }
        }
    }

    names
}

//! Per-file signal extraction: path category and dominant symbol.

use std::fmt;

use crate::commit::diff::ChangeRecord;
use crate::commit::symbol::dominant_symbol;

/// Category of a changed file, derived from its path.
///
/// Declaration order is the tie-break order for the majority category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Source,
    Test,
    Docs,
    Config,
    Build,
    Other,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Source,
        Category::Test,
        Category::Docs,
        Category::Config,
        Category::Build,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Source => "Source",
            Category::Test => "Test",
            Category::Docs => "Docs",
            Category::Config => "Config",
            Category::Build => "Build",
            Category::Other => "Other",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signals extracted from one change record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSignal<'a> {
    pub record: &'a ChangeRecord,
    pub category: Category,
    pub dominant_symbol: Option<String>,
}

/// Directory names that mark everything below them as tests.
const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "spec", "specs", "testing"];

/// File stem suffixes used by test files (`parser_test.go`, `App.test.tsx`, `FooTest.java`).
const TEST_STEM_SUFFIXES: &[&str] = &["_test", "_tests", ".test", "_spec", ".spec", "Test", "Tests"];

const DOC_EXTENSIONS: &[&str] = &["md", "markdown", "mdx", "rst", "adoc", "asciidoc", "org"];

/// Well-known documentation file names, matched on the stem.
const DOC_STEMS: &[&str] = &[
    "readme",
    "changelog",
    "license",
    "licence",
    "copying",
    "authors",
    "contributing",
];

const BUILD_FILES: &[&str] = &[
    "Cargo.toml",
    "Cargo.lock",
    "build.rs",
    "package.json",
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "pnpm-workspace.yaml",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "requirements.txt",
    "Pipfile",
    "Pipfile.lock",
    "poetry.lock",
    "go.mod",
    "go.sum",
    "Makefile",
    "GNUmakefile",
    "CMakeLists.txt",
    "meson.build",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
    "pom.xml",
    "Gemfile",
    "Gemfile.lock",
    "composer.json",
    "composer.lock",
    "mix.exs",
    "mix.lock",
    "Dockerfile",
    "BUILD",
    "BUILD.bazel",
    "WORKSPACE",
    "flake.nix",
];

const CONFIG_EXTENSIONS: &[&str] = &[
    "toml",
    "yaml",
    "yml",
    "json",
    "ini",
    "cfg",
    "conf",
    "properties",
    "xml",
    "plist",
    "env",
];

const CONFIG_FILES: &[&str] = &[
    ".gitignore",
    ".gitattributes",
    ".gitmodules",
    ".editorconfig",
    ".env",
    ".dockerignore",
    ".npmrc",
    ".nvmrc",
    ".prettierrc",
    ".eslintrc",
];

const SOURCE_EXTENSIONS: &[&str] = &[
    "rs", "py", "pyi", "js", "jsx", "mjs", "cjs", "ts", "tsx", "go", "java", "kt", "kts", "scala",
    "c", "h", "cc", "cpp", "cxx", "hpp", "hh", "cs", "fs", "rb", "php", "swift", "m", "mm", "sh",
    "bash", "zsh", "fish", "ps1", "lua", "pl", "pm", "ex", "exs", "erl", "hrl", "hs", "ml", "mli",
    "clj", "cljs", "dart", "r", "jl", "sql", "vue", "svelte", "zig", "nim", "groovy", "elm",
];

/// File name component of a slash-separated repository path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// File name without its final extension. Dotfiles keep their full name.
pub fn path_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Lowercased final extension, if any. Dotfiles have none.
fn extension(path: &str) -> Option<String> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(name[idx + 1..].to_ascii_lowercase()),
    }
}

/// Whether the path follows test directory or test file naming conventions.
pub fn is_test_path(path: &str) -> bool {
    let mut components: Vec<&str> = path.split('/').collect();
    components.pop();
    if components
        .iter()
        .any(|dir| TEST_DIRS.contains(&dir.to_ascii_lowercase().as_str()))
    {
        return true;
    }

    let stem = path_stem(path);
    stem.starts_with("test_") || TEST_STEM_SUFFIXES.iter().any(|s| stem.ends_with(s))
}

/// Strip test naming affixes from a stem (`test_parser` → `parser`).
///
/// Returns the stem unchanged if stripping would leave nothing.
pub fn strip_test_affixes(stem: &str) -> &str {
    let stripped = stem.strip_prefix("test_").unwrap_or(stem);
    let stripped = TEST_STEM_SUFFIXES
        .iter()
        .find_map(|s| stripped.strip_suffix(s))
        .unwrap_or(stripped);

    if stripped.is_empty() { stem } else { stripped }
}

/// Categorize a repository path. Total: unmatched paths are [`Category::Other`].
pub fn categorize(path: &str) -> Category {
    if is_test_path(path) {
        return Category::Test;
    }

    let name = file_name(path);
    let ext = extension(path);
    let ext = ext.as_deref();

    // Well-known doc names only count without a real extension (`LICENSE`, `README.txt`).
    if ext.is_some_and(|e| DOC_EXTENSIONS.contains(&e))
        || (matches!(ext, None | Some("txt"))
            && DOC_STEMS.contains(&path_stem(path).to_ascii_lowercase().as_str()))
    {
        return Category::Docs;
    }

    if BUILD_FILES.contains(&name) {
        return Category::Build;
    }

    if CONFIG_FILES.contains(&name) || ext.is_some_and(|e| CONFIG_EXTENSIONS.contains(&e)) {
        return Category::Config;
    }

    if ext.is_some_and(|e| SOURCE_EXTENSIONS.contains(&e)) {
        return Category::Source;
    }

    Category::Other
}

/// Extract one signal per record, preserving record order.
pub fn extract_signals(records: &[ChangeRecord]) -> Vec<FileSignal<'_>> {
    records
        .iter()
        .map(|record| {
            let category = categorize(record.path());
            let dominant_symbol = match category {
                Category::Source | Category::Test => dominant_symbol(record.hunks()),
                _ => None,
            };
            FileSignal {
                record,
                category,
                dominant_symbol,
            }
        })
        .collect()
}

/// Number of signals per category, indexed in declaration order.
pub fn category_counts(signals: &[FileSignal<'_>]) -> [usize; 6] {
    let mut counts = [0usize; 6];
    for signal in signals {
        counts[signal.category.index()] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::diff::{HunkLine, HunkSummary, LineOrigin};

    #[test]
    fn test_categorize_tests() {
        let paths = vec![
            "tests/cli_test.rs",
            "src/__tests__/App.tsx",
            "spec/models/user_spec.rb",
            "pkg/parser/parser_test.go",
            "test_util.py",
            "src/components/Button.test.tsx",
            "src/main/java/com/acme/ParserTest.java",
            "Tests/Docs.md",
        ];
        for path in paths {
            assert_eq!(categorize(path), Category::Test, "Expected Test for {}", path);
        }
    }

    #[test]
    fn test_categorize_docs() {
        for path in ["README.md", "docs/guide.rst", "LICENSE", "CHANGELOG", "notes.markdown", "README.txt"] {
            assert_eq!(categorize(path), Category::Docs, "Expected Docs for {}", path);
        }
    }

    #[test]
    fn test_categorize_build() {
        for path in ["Cargo.toml", "Cargo.lock", "frontend/package.json", "go.mod", "Makefile", "CMakeLists.txt", "requirements.txt", "build.rs"] {
            assert_eq!(categorize(path), Category::Build, "Expected Build for {}", path);
        }
    }

    #[test]
    fn test_categorize_config() {
        for path in [".gitignore", "config/app.yaml", "settings.json", "rustfmt.toml", ".github/workflows/ci.yml", "app.ini"] {
            assert_eq!(categorize(path), Category::Config, "Expected Config for {}", path);
        }
    }

    #[test]
    fn test_categorize_source() {
        for path in [
            "src/util.py",
            "src/main.rs",
            "web/app.tsx",
            "cmd/server/main.go",
            "lib/Foo.java",
            "scripts/deploy.sh",
            "src/changelog.rs",
            "src/license.py",
            "lib/authors.go",
        ] {
            assert_eq!(categorize(path), Category::Source, "Expected Source for {}", path);
        }
    }

    #[test]
    fn test_categorize_other() {
        for path in ["assets/logo.png", "data.csv", "Procfile", "notes.txt", ".hidden"] {
            assert_eq!(categorize(path), Category::Other, "Expected Other for {}", path);
        }
    }

    #[test]
    fn test_test_directory_only_matches_whole_components() {
        assert_eq!(categorize("src/testing_utils.rs"), Category::Source);
        assert_eq!(categorize("src/contest.rs"), Category::Source);
        assert_eq!(categorize("latest/main.rs"), Category::Source);
    }

    #[test]
    fn test_path_stem() {
        assert_eq!(path_stem("src/util.py"), "util");
        assert_eq!(path_stem("Makefile"), "Makefile");
        assert_eq!(path_stem(".gitignore"), ".gitignore");
        assert_eq!(path_stem("src/App.test.tsx"), "App.test");
        assert_eq!(path_stem("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn test_strip_test_affixes() {
        assert_eq!(strip_test_affixes("test_parser"), "parser");
        assert_eq!(strip_test_affixes("parser_test"), "parser");
        assert_eq!(strip_test_affixes("App.test"), "App");
        assert_eq!(strip_test_affixes("ParserTest"), "Parser");
        assert_eq!(strip_test_affixes("user_spec"), "user");
        assert_eq!(strip_test_affixes("helpers"), "helpers");
        assert_eq!(strip_test_affixes("Test"), "Test");
    }

    #[test]
    fn test_extract_signals_preserves_order_and_detects_symbols() {
        let records = vec![
            ChangeRecord::modified("src/util.py").with_hunks(vec![HunkSummary {
                context: Some("def parse_config(path):".to_string()),
                lines: vec![HunkLine::new(LineOrigin::Added, "    return {}")],
            }]),
            ChangeRecord::added("tests/test_util.py"),
            ChangeRecord::deleted("README.md"),
        ];

        let signals = extract_signals(&records);
        assert_eq!(signals.len(), 3);
        assert_eq!(signals[0].record.path(), "src/util.py");
        assert_eq!(signals[0].category, Category::Source);
        assert_eq!(signals[0].dominant_symbol.as_deref(), Some("parse_config"));
        assert_eq!(signals[1].category, Category::Test);
        assert_eq!(signals[1].dominant_symbol, None);
        assert_eq!(signals[2].category, Category::Docs);
    }

    #[test]
    fn test_symbols_only_extracted_for_code() {
        let prose = HunkSummary {
            context: None,
            lines: vec![HunkLine::new(
                LineOrigin::Added,
                "Install the tool (requires Rust 1.80 or newer)",
            )],
        };
        let definition = HunkSummary {
            context: None,
            lines: vec![HunkLine::new(LineOrigin::Added, "def parse_config(path):")],
        };
        let records = vec![
            ChangeRecord::modified("README.md").with_hunks(vec![prose]),
            ChangeRecord::modified("docs/guide.md").with_hunks(vec![definition.clone()]),
            ChangeRecord::modified("notes.txt").with_hunks(vec![definition.clone()]),
            ChangeRecord::modified("tests/test_config.py").with_hunks(vec![definition]),
        ];

        let signals = extract_signals(&records);
        assert_eq!(signals[0].category, Category::Docs);
        assert_eq!(signals[0].dominant_symbol, None);
        assert_eq!(signals[1].dominant_symbol, None);
        assert_eq!(signals[2].category, Category::Other);
        assert_eq!(signals[2].dominant_symbol, None);
        assert_eq!(signals[3].category, Category::Test);
        assert_eq!(signals[3].dominant_symbol.as_deref(), Some("parse_config"));
    }

    #[test]
    fn test_category_counts() {
        let records = vec![
            ChangeRecord::modified("src/a.rs"),
            ChangeRecord::modified("tests/a.rs"),
            ChangeRecord::modified("tests/b.rs"),
        ];
        let signals = extract_signals(&records);
        assert_eq!(category_counts(&signals), [1, 2, 0, 0, 0, 0]);
    }

    #[test]
    fn test_category_order() {
        let sorted: Vec<Category> = Category::ALL.to_vec();
        let mut shuffled = vec![
            Category::Other,
            Category::Config,
            Category::Source,
            Category::Build,
            Category::Docs,
            Category::Test,
        ];
        shuffled.sort();
        assert_eq!(shuffled, sorted);
    }
}

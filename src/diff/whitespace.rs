//! Whitespace-aware content comparison.
//!
//! Content equality between an old and a new node depends on the configured
//! [`WhitespaceMode`]. In `LanguageAware` mode the source language decides:
//! free-form languages normalize whitespace away, whitespace-significant ones
//! (Python, YAML, Makefiles) compare exactly and report [`WhitespaceIssue`]s.

use crate::model::WhitespaceIssue;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffOp};
use std::borrow::Cow;
use std::path::Path;

/// How whitespace differences affect content equality.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespaceMode {
    /// Byte-for-byte comparison
    #[default]
    Exact,
    /// Ignore leading and trailing whitespace on each line
    IgnoreLeadingTrailing,
    /// Ignore all whitespace
    IgnoreAll,
    /// Decide per language
    LanguageAware,
}

/// Source language, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    CSharp,
    VisualBasic,
    FSharp,
    Java,
    Kotlin,
    JavaScript,
    TypeScript,
    Rust,
    Go,
    C,
    Cpp,
    Python,
    Yaml,
    Makefile,
    Unknown,
}

impl Language {
    /// Detect a language from a file path.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = Path::new(path);
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if file_name == "makefile" || file_name == "gnumakefile" {
            return Self::Makefile;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "cs" | "csx" => Self::CSharp,
            "vb" => Self::VisualBasic,
            "fs" | "fsi" | "fsx" => Self::FSharp,
            "java" => Self::Java,
            "kt" | "kts" => Self::Kotlin,
            "js" | "mjs" | "cjs" | "jsx" => Self::JavaScript,
            "ts" | "tsx" => Self::TypeScript,
            "rs" => Self::Rust,
            "go" => Self::Go,
            "c" | "h" => Self::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Self::Cpp,
            "py" | "pyi" => Self::Python,
            "yaml" | "yml" => Self::Yaml,
            "mk" | "mak" => Self::Makefile,
            _ => Self::Unknown,
        }
    }

    /// Indentation or layout carries meaning.
    #[must_use]
    pub const fn is_whitespace_significant(&self) -> bool {
        matches!(self, Self::Python | Self::Yaml | Self::Makefile | Self::FSharp)
    }

    /// Comments start with `#` rather than `//`.
    const fn uses_hash_comments(&self) -> bool {
        matches!(self, Self::Python | Self::Yaml | Self::Makefile)
    }

    const fn uses_apostrophe_comments(&self) -> bool {
        matches!(self, Self::VisualBasic)
    }
}

/// Compares node text under a whitespace mode for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitespaceComparator {
    mode: WhitespaceMode,
    language: Language,
}

impl WhitespaceComparator {
    #[must_use]
    pub const fn new(mode: WhitespaceMode, language: Language) -> Self {
        Self { mode, language }
    }

    #[must_use]
    pub const fn mode(&self) -> WhitespaceMode {
        self.mode
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Whether whitespace issues should be reported.
    #[must_use]
    pub const fn reports_issues(&self) -> bool {
        matches!(self.mode, WhitespaceMode::LanguageAware) && self.language.is_whitespace_significant()
    }

    /// Text as seen by the equality check.
    #[must_use]
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.mode {
            WhitespaceMode::Exact => Cow::Borrowed(text),
            WhitespaceMode::IgnoreLeadingTrailing => Cow::Owned(
                text.lines()
                    .map(str::trim)
                    .collect::<Vec<_>>()
                    .join("\n")
                    .trim()
                    .to_string(),
            ),
            WhitespaceMode::IgnoreAll => {
                Cow::Owned(text.chars().filter(|c| !c.is_whitespace()).collect())
            }
            WhitespaceMode::LanguageAware if self.language.is_whitespace_significant() => {
                Cow::Borrowed(text)
            }
            WhitespaceMode::LanguageAware => {
                Cow::Owned(text.split_whitespace().collect::<Vec<_>>().join(" "))
            }
        }
    }

    /// Content equality under this comparator.
    #[must_use]
    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        a == b || self.normalize(a) == self.normalize(b)
    }

    /// The texts differ, but only in whitespace or comments.
    ///
    /// For whitespace-significant languages indentation counts as content.
    #[must_use]
    pub fn formatting_only(&self, a: &str, b: &str) -> bool {
        a != b && self.strip_formatting(a) == self.strip_formatting(b)
    }

    fn strip_formatting(&self, text: &str) -> String {
        let without_comments = strip_comments(text, self.language);
        if self.language.is_whitespace_significant() {
            without_comments
                .lines()
                .map(str::trim_end)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            without_comments.chars().filter(|c| !c.is_whitespace()).collect()
        }
    }
}

/// Remove line and block comments, leaving string literals intact.
fn strip_comments(text: &str, language: Language) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q || c == '\n' {
                quote = None;
            }
            continue;
        }

        let line_comment = if language.uses_hash_comments() {
            c == '#'
        } else if language.uses_apostrophe_comments() {
            c == '\''
        } else {
            c == '/' && chars.peek() == Some(&'/')
        };

        if line_comment {
            while chars.peek().is_some_and(|&n| n != '\n') {
                chars.next();
            }
        } else if !language.uses_hash_comments() && c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = '\0';
            for n in chars.by_ref() {
                if prev == '*' && n == '/' {
                    break;
                }
                prev = n;
            }
        } else {
            if c == '"' || (c == '\'' && !language.uses_apostrophe_comments()) {
                quote = Some(c);
            }
            out.push(c);
        }
    }
    out
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

fn has_trailing_whitespace(line: &str) -> bool {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.ends_with([' ', '\t'])
}

/// Detect whitespace anomalies between an old and a new text.
///
/// `old` is `None` for added content. Issues are returned sorted and deduplicated.
#[must_use]
pub fn detect_issues(old: Option<&str>, new: &str) -> Vec<WhitespaceIssue> {
    let mut issues = Vec::new();
    let new_lines: Vec<&str> = new.split('\n').collect();

    for line in &new_lines {
        let indent = leading_whitespace(line);
        if indent.contains('\t') && indent.contains(' ') {
            issues.push(WhitespaceIssue::MixedTabsSpaces);
        }
        if has_trailing_whitespace(line) {
            issues.push(WhitespaceIssue::TrailingWhitespace);
        }
    }

    if let Some(old) = old {
        if old.contains("\r\n") != new.contains("\r\n") {
            issues.push(WhitespaceIssue::LineEndingChanged);
        }

        let old_lines: Vec<&str> = old.split('\n').collect();
        let old_content: Vec<&str> = old_lines.iter().map(|l| l.trim()).collect();
        let new_content: Vec<&str> = new_lines.iter().map(|l| l.trim()).collect();

        for op in capture_diff_slices(Algorithm::Myers, &old_content, &new_content) {
            if let DiffOp::Equal {
                old_index,
                new_index,
                len,
            } = op
            {
                for k in 0..len {
                    let old_indent = leading_whitespace(old_lines[old_index + k]);
                    let new_indent = leading_whitespace(new_lines[new_index + k]);
                    if old_content[old_index + k].is_empty() || old_indent == new_indent {
                        continue;
                    }
                    issues.push(WhitespaceIssue::IndentationChanged);
                    let old_tabs = old_indent.contains('\t');
                    let new_tabs = new_indent.contains('\t');
                    if old_tabs != new_tabs {
                        issues.push(WhitespaceIssue::AmbiguousTabWidth);
                    }
                }
            }
        }
    }

    issues.sort_unstable();
    issues.dedup();
    issues
}

//! Parser selection.

use super::json_tree::JsonTreeParser;
use super::line::LineParser;
use super::traits::{FormatConfidence, SourceParser};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which parser turns input files into trees.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ParserKind {
    /// Pick by content and extension
    #[default]
    Auto,
    /// One node per line, with conditional directives
    Lines,
    /// Pre-built `StructuralNode` JSON
    JsonTree,
}

impl ParserKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Lines => "lines",
            Self::JsonTree => "json-tree",
        }
    }
}

/// Holds the available parsers and picks one per input.
#[derive(Debug, Default)]
pub struct ParserRegistry {
    lines: LineParser,
    json_tree: JsonTreeParser,
}

impl ParserRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: LineParser::new(),
            json_tree: JsonTreeParser::new(),
        }
    }

    /// Parser for `kind`; `Auto` picks the most confident parser for the input.
    #[must_use]
    pub fn select(&self, kind: ParserKind, text: &str, path: &str) -> &dyn SourceParser {
        match kind {
            ParserKind::Lines => &self.lines,
            ParserKind::JsonTree => &self.json_tree,
            ParserKind::Auto => self.detect(text, path),
        }
    }

    fn detect(&self, text: &str, path: &str) -> &dyn SourceParser {
        let candidates: [&dyn SourceParser; 2] = [&self.json_tree, &self.lines];
        let mut best: &dyn SourceParser = &self.lines;
        let mut best_confidence = FormatConfidence::NONE;
        for parser in candidates {
            let confidence = parser.detect(text, path);
            if confidence > best_confidence {
                best = parser;
                best_confidence = confidence;
            }
        }
        tracing::debug!(parser = best.name(), path, "selected parser");
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_prefers_json_tree_for_trees() {
        let registry = ParserRegistry::new();
        let tree = r#"{"kind": "File", "children": []}"#;
        assert_eq!(registry.select(ParserKind::Auto, tree, "a.json").name(), "json-tree");
        assert_eq!(registry.select(ParserKind::Auto, "class A {}", "A.cs").name(), "lines");
    }

    #[test]
    fn test_explicit_kind_wins() {
        let registry = ParserRegistry::new();
        let tree = r#"{"kind": "File"}"#;
        assert_eq!(registry.select(ParserKind::Lines, tree, "a.json").name(), "lines");
    }
}

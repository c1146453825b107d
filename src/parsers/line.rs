//! Line-oriented parser.
//!
//! Produces a `File` root whose children are one unnamed `Line` node per
//! source line. Without a configuration every line is kept verbatim; under a
//! configuration, conditional directives are evaluated against its symbols and
//! both the directive lines and inactive regions are dropped.

use super::conditional::{ConditionalState, Directive};
use super::traits::{FormatConfidence, SourceParser};
use crate::config::Configuration;
use crate::error::Result;
use crate::model::{NodeKind, Span, StructuralNode};

/// Line-oriented fallback parser for any text file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser;

impl LineParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn build(text: &str, path: &str, configuration: Option<&Configuration>) -> Result<StructuralNode> {
        let mut state = configuration.map(|c| ConditionalState::new(c.symbols.iter().map(String::as_str)));
        let mut children = Vec::new();
        let mut line_count = 0;

        for (index, line) in text.lines().enumerate() {
            let number = index + 1;
            line_count = number;

            if let Some(state) = state.as_mut() {
                if let Some(directive) = Directive::parse(line) {
                    state.apply(&directive, number)?;
                    continue;
                }
                if !state.is_active() {
                    continue;
                }
            }

            let line_no = u32::try_from(number).unwrap_or(u32::MAX);
            let width = u32::try_from(line.chars().count()).unwrap_or(u32::MAX);
            children.push(
                StructuralNode::new(NodeKind::Line, None, line)
                    .with_span(Span::new(path, line_no, line_no).with_columns(1, width.saturating_add(1))),
            );
        }

        if let Some(state) = state.as_ref() {
            state.finish()?;
        }

        Ok(StructuralNode::new(NodeKind::File, Some(path), text)
            .with_span(Span::new(path, 1, u32::try_from(line_count.max(1)).unwrap_or(u32::MAX)))
            .with_children(children))
    }
}

impl SourceParser for LineParser {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn parse(&self, text: &str, path: &str) -> Result<StructuralNode> {
        Self::build(text, path, None)
    }

    fn parse_under(&self, text: &str, path: &str, configuration: Option<&Configuration>) -> Result<StructuralNode> {
        Self::build(text, path, configuration)
    }

    fn detect(&self, _text: &str, _path: &str) -> FormatConfidence {
        FormatConfidence::LOW
    }
}

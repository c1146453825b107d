//! Parser trait and format detection primitives.

use crate::config::Configuration;
use crate::error::Result;
use crate::model::StructuralNode;

/// Confidence that a parser can handle some input.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FormatConfidence(f32);

impl FormatConfidence {
    /// Definitely not this format
    pub const NONE: Self = Self(0.0);
    /// Any text qualifies
    pub const LOW: Self = Self(0.25);
    pub const MEDIUM: Self = Self(0.5);
    pub const HIGH: Self = Self(0.75);
    pub const CERTAIN: Self = Self(1.0);

    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub const fn value(&self) -> f32 {
        self.0
    }

    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.0 >= Self::LOW.0
    }
}

impl Default for FormatConfidence {
    fn default() -> Self {
        Self::NONE
    }
}

/// Turns source text into a [`StructuralNode`] tree.
///
/// Implementations must be deterministic: the same text, path and
/// configuration always produce the same tree. Failures are returned as
/// [`DeclDiffError::Parse`](crate::error::DeclDiffError::Parse) and surface in
/// the comparison as a synthetic parse-error change.
pub trait SourceParser: Send + Sync {
    /// Short parser name used in logs.
    fn name(&self) -> &'static str;

    /// Parse `text` read from `path`.
    fn parse(&self, text: &str, path: &str) -> Result<StructuralNode>;

    /// Parse `text` as seen under one build configuration.
    ///
    /// Parsers without conditional-compilation support ignore the
    /// configuration.
    fn parse_under(&self, text: &str, path: &str, configuration: Option<&Configuration>) -> Result<StructuralNode> {
        let _ = configuration;
        self.parse(text, path)
    }

    /// How likely this parser is to handle `text`.
    fn detect(&self, text: &str, path: &str) -> FormatConfidence;
}

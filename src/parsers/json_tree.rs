//! Reads a pre-built structural tree serialized as JSON.
//!
//! This is the hand-off format for external language front ends: any tool
//! that can emit `StructuralNode` JSON gets the full matcher and classifier.

use super::traits::{FormatConfidence, SourceParser};
use crate::error::{DeclDiffError, ParseErrorKind, Result};
use crate::model::{declaration_header, StructuralNode};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTreeParser;

impl JsonTreeParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Fill in what serialized trees commonly omit: signatures default to the
/// declaration header of the raw text and spans inherit the source path.
fn complete(node: &mut StructuralNode, path: &str) {
    if node.signature.is_empty() {
        node.signature = declaration_header(node.kind, &node.raw_text);
    }
    if node.span.file.is_empty() {
        node.span.file = path.to_string();
    }
    for child in &mut node.children {
        complete(child, path);
    }
}

impl SourceParser for JsonTreeParser {
    fn name(&self) -> &'static str {
        "json-tree"
    }

    fn parse(&self, text: &str, path: &str) -> Result<StructuralNode> {
        let mut root: StructuralNode = serde_json::from_str(text).map_err(|e| {
            DeclDiffError::parse(format!("reading tree from {path}"), ParseErrorKind::InvalidJson(e.to_string()))
        })?;
        complete(&mut root, path);
        Ok(root)
    }

    fn detect(&self, text: &str, path: &str) -> FormatConfidence {
        let trimmed = text.trim_start();
        if !trimmed.starts_with('{') {
            return FormatConfidence::NONE;
        }
        let has_kind = trimmed.contains("\"kind\"");
        match (has_kind, path.to_lowercase().ends_with(".json")) {
            (true, true) => FormatConfidence::CERTAIN,
            (true, false) => FormatConfidence::HIGH,
            (false, _) => FormatConfidence::NONE,
        }
    }
}

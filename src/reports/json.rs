//! JSON report generator.

use super::{ReportFormat, ReportGenerator};
use crate::diff::DiffResult;
use crate::error::{DeclDiffError, ReportErrorKind, Result};
use crate::pipeline::BatchResult;
use serde::Serialize;

/// JSON report generator
#[derive(Debug, Clone, Copy)]
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.map_err(|e| {
            DeclDiffError::report(
                "rendering JSON report",
                ReportErrorKind::JsonSerializationError(e.to_string()),
            )
        })
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_diff_report(&self, result: &DiffResult) -> Result<String> {
        self.render(result)
    }

    fn generate_batch_report(&self, batch: &BatchResult) -> Result<String> {
        self.render(batch)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Change, NodeKind, Span, StructuralNode, Visibility};

    fn result() -> DiffResult {
        let node = StructuralNode::new(NodeKind::Method, Some("Run"), "public void Run() {}")
            .with_visibility(Visibility::Public)
            .with_span(Span::new("Api.cs", 4, 4));
        DiffResult::new(vec![Change::removed(&node, "File:Api.cs")], vec!["net8.0".to_string()])
    }

    #[test]
    fn test_wire_field_names() {
        let json = JsonReporter::new().generate_diff_report(&result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["analyzedConfigurations"][0], "net8.0");
        let change = &value["changes"][0];
        assert_eq!(change["type"], "Removed");
        assert_eq!(change["kind"], "Method");
        assert_eq!(change["oldLocation"]["startLine"], 4);
        assert_eq!(change["oldContent"], "public void Run() {}");
        assert!(change["newLocation"].is_null());
        assert!(change.get("scope").is_none());
        assert_eq!(value["summary"]["totalChanges"], 1);
    }

    #[test]
    fn test_compact_is_single_line_and_deterministic() {
        let reporter = JsonReporter::new().pretty(false);
        let a = reporter.generate_diff_report(&result()).unwrap();
        let b = reporter.generate_diff_report(&result()).unwrap();
        assert!(!a.contains('\n'));
        assert_eq!(a, b);
    }
}

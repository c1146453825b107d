//! Report generation for comparison results.
//!
//! - JSON: the change-tree wire format, for programmatic consumers
//! - Summary: compact counts and an indented change tree for terminals
//!
//! Both reporters are deterministic: the same result always renders to the
//! same bytes.

mod json;
mod summary;
mod types;

pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use types::ReportFormat;

use crate::diff::DiffResult;
use crate::error::{DeclDiffError, Result};
use crate::pipeline::BatchResult;
use std::io::Write;

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a single comparison.
    fn generate_diff_report(&self, result: &DiffResult) -> Result<String>;

    /// Render a batch comparison.
    fn generate_batch_report(&self, batch: &BatchResult) -> Result<String>;

    /// Write a single-comparison report to a writer.
    fn write_diff_report(&self, result: &DiffResult, writer: &mut dyn Write) -> Result<()> {
        let report = self.generate_diff_report(result)?;
        writer
            .write_all(report.as_bytes())
            .map_err(|e| DeclDiffError::Io {
                path: None,
                message: "writing report".to_string(),
                source: e,
            })
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format.
///
/// `compact` only affects JSON, `colored` only the summary.
#[must_use]
pub fn create_reporter(format: ReportFormat, compact: bool, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new().pretty(!compact)),
        ReportFormat::Summary => {
            let reporter = SummaryReporter::new();
            Box::new(if colored { reporter } else { reporter.no_color() })
        }
    }
}

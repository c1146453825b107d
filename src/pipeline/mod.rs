//! Pipeline orchestration: read, parse, diff per configuration, merge, report.
//!
//! CLI handlers drive everything through [`ComparisonService`] and the
//! report stage, so single-file and batch runs share one code path.

mod batch;
mod compare;
mod output;
mod report_stage;

pub use batch::{BatchResult, BatchSummary, BatchUnit, FilePair, UnitOutcome};
pub use compare::ComparisonService;
pub use output::{should_use_color, write_output, OutputTarget};
pub use report_stage::{output_batch_report, output_report};

use crate::diff::DiffSummary;
use crate::model::Impact;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Target configurations could not be resolved
    #[error("Configuration setup failed: {source}")]
    SetupFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Comparison failed outright
    #[error("Comparison failed for {path}: {source}")]
    CompareFailed {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI integration
pub mod exit_codes {
    /// No change at or above the reporting threshold
    pub const SUCCESS: i32 = 0;
    /// Changes were detected
    pub const CHANGES_DETECTED: i32 = 1;
    /// At least one change breaks the public API
    pub const BREAKING_PUBLIC_API: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Exit code for a comparison summary under a reporting threshold.
#[must_use]
pub fn exit_code_for(summary: &DiffSummary, min_impact: Impact) -> i32 {
    if summary.count_for_impact(Impact::BreakingPublicApi) > 0 {
        return exit_codes::BREAKING_PUBLIC_API;
    }
    let qualifying = Impact::ALL
        .iter()
        .filter(|impact| **impact >= min_impact)
        .any(|impact| summary.count_for_impact(*impact) > 0);
    if qualifying {
        exit_codes::CHANGES_DETECTED
    } else {
        exit_codes::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn summary(counts: &[(Impact, usize)]) -> DiffSummary {
        let by_impact: BTreeMap<Impact, usize> = counts.iter().copied().collect();
        DiffSummary {
            total_changes: counts.iter().map(|(_, c)| c).sum(),
            has_breaking_changes: counts.iter().any(|(i, c)| i.is_breaking() && *c > 0),
            by_impact,
            ..DiffSummary::default()
        }
    }

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::CHANGES_DETECTED, 1);
        assert_eq!(exit_codes::BREAKING_PUBLIC_API, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_exit_code_for_summary() {
        assert_eq!(exit_code_for(&summary(&[]), Impact::FormattingOnly), exit_codes::SUCCESS);
        assert_eq!(
            exit_code_for(&summary(&[(Impact::NonBreaking, 2)]), Impact::FormattingOnly),
            exit_codes::CHANGES_DETECTED
        );
        assert_eq!(
            exit_code_for(&summary(&[(Impact::NonBreaking, 2)]), Impact::BreakingInternalApi),
            exit_codes::SUCCESS
        );
        assert_eq!(
            exit_code_for(&summary(&[(Impact::BreakingPublicApi, 1)]), Impact::BreakingPublicApi),
            exit_codes::BREAKING_PUBLIC_API
        );
    }
}

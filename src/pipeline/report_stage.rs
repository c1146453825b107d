//! Report output stage.

use super::batch::{BatchResult, BatchUnit, UnitOutcome};
use super::{should_use_color, write_output, OutputTarget};
use crate::config::AppConfig;
use crate::diff::DiffResult;
use crate::reports::create_reporter;
use anyhow::{Context, Result};

/// Filter a result by the configured threshold, render it and write it out.
pub fn output_report(config: &AppConfig, result: &DiffResult) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let reporter = create_reporter(
        config.output.format,
        config.output.compact,
        should_use_color(config.output.no_color, &target),
    );
    let filtered = result.filtered(config.output.min_impact);
    let report = reporter
        .generate_diff_report(&filtered)
        .context("Failed to render report")?;
    write_output(&report, &target, config.behavior.quiet)
}

/// Same as [`output_report`] for a batch; the threshold applies per unit.
pub fn output_batch_report(config: &AppConfig, batch: &BatchResult) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let reporter = create_reporter(
        config.output.format,
        config.output.compact,
        should_use_color(config.output.no_color, &target),
    );
    let filtered = BatchResult {
        summary: batch.summary.clone(),
        units: batch
            .units
            .iter()
            .map(|unit| BatchUnit {
                path: unit.path.clone(),
                outcome: match &unit.outcome {
                    UnitOutcome::Compared { result } => UnitOutcome::Compared {
                        result: result.filtered(config.output.min_impact),
                    },
                    failed @ UnitOutcome::Failed { .. } => failed.clone(),
                },
            })
            .collect(),
    };
    let report = reporter
        .generate_batch_report(&filtered)
        .context("Failed to render batch report")?;
    write_output(&report, &target, config.behavior.quiet)
}

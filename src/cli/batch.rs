//! Batch command handler.
//!
//! Compares many old/new file pairs in one run and reports them together.

use crate::config::AppConfig;
use crate::pipeline::{exit_code_for, exit_codes, output_batch_report, ComparisonService, FilePair, PipelineError};
use anyhow::Result;

/// Run the batch command, returning the desired exit code.
///
/// The exit code reflects the combined change counts; any failed unit
/// raises it to [`exit_codes::ERROR`] after the report has been written.
pub fn run_batch(config: &AppConfig, pairs: &[FilePair]) -> Result<i32> {
    let service =
        ComparisonService::from_config(config).map_err(|e| PipelineError::SetupFailed { source: e.into() })?;

    let batch = service
        .compare_batch(pairs, &config.configurations.targets)
        .map_err(|e| PipelineError::SetupFailed { source: e.into() })?;

    if !config.behavior.quiet {
        tracing::info!(
            units = batch.summary.total_units,
            failed = batch.summary.failed,
            changes = batch.summary.changes.total_changes,
            "Batch comparison finished"
        );
    }

    output_batch_report(config, &batch).map_err(|source| PipelineError::ReportFailed { source })?;

    if batch.summary.failed > 0 {
        return Ok(exit_codes::ERROR);
    }
    Ok(exit_code_for(&batch.summary.changes, config.output.min_impact))
}

//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing two versions of a file.

use crate::config::AppConfig;
use crate::pipeline::{exit_code_for, output_report, ComparisonService, PipelineError};
use anyhow::Result;
use std::path::Path;

/// Run the diff command, returning the desired exit code.
///
/// A missing side (`None`) compares against an absent file, so the whole
/// tree on the other side is reported as added or removed.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_diff(config: &AppConfig, old: Option<&Path>, new: Option<&Path>) -> Result<i32> {
    let service =
        ComparisonService::from_config(config).map_err(|e| PipelineError::SetupFailed { source: e.into() })?;

    let result = service
        .compare_files(old, new, &config.configurations.targets)
        .map_err(|e| PipelineError::CompareFailed {
            path: new.or(old).map(|p| p.display().to_string()).unwrap_or_default(),
            source: e.into(),
        })?;

    if !config.behavior.quiet {
        tracing::info!(
            changes = result.summary.total_changes,
            breaking = result.has_breaking_changes(),
            "Compared {} configuration(s)",
            result.analyzed_configurations.len().max(1)
        );
    }

    let exit_code = exit_code_for(&result.summary, config.output.min_impact);
    output_report(config, &result).map_err(|source| PipelineError::ReportFailed { source })?;
    Ok(exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Impact;
    use crate::pipeline::exit_codes;
    use tempfile::TempDir;

    fn config_into(dir: &TempDir) -> AppConfig {
        AppConfig::builder()
            .output_file(Some(dir.path().join("report.json")))
            .quiet(true)
            .build()
    }

    #[test]
    fn test_identical_files_exit_success() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("same.txt");
        std::fs::write(&file, "a\nb\n").unwrap();

        let code = run_diff(&config_into(&tmp), Some(&file), Some(&file)).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
    }

    #[test]
    fn test_changed_files_report_changes() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("old.txt");
        let new = tmp.path().join("new.txt");
        std::fs::write(&old, "a\nb\n").unwrap();
        std::fs::write(&new, "a\nc\n").unwrap();

        let config = config_into(&tmp);
        let code = run_diff(&config, Some(&old), Some(&new)).unwrap();
        assert_eq!(code, exit_codes::CHANGES_DETECTED);
        assert!(tmp.path().join("report.json").exists());
    }

    #[test]
    fn test_threshold_above_changes_exits_success() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("old.txt");
        let new = tmp.path().join("new.txt");
        std::fs::write(&old, "a\n").unwrap();
        std::fs::write(&new, "b\n").unwrap();

        let mut config = config_into(&tmp);
        config.output.min_impact = Impact::BreakingInternalApi;
        assert_eq!(run_diff(&config, Some(&old), Some(&new)).unwrap(), exit_codes::SUCCESS);
    }

    #[test]
    fn test_unreadable_input_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.txt");
        assert!(run_diff(&config_into(&tmp), Some(&missing), Some(&missing)).is_err());
    }
}

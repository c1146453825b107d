//! Batch comparison of many file pairs.

use super::compare::ComparisonService;
use crate::config::Configuration;
use crate::diff::{DiffResult, DiffSummary};
use crate::error::{DeclDiffError, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One unit of a batch: the old and new version of a file.
///
/// A missing side means the file was added or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    /// Reported path (and sort key)
    pub path: String,
    pub old: Option<PathBuf>,
    pub new: Option<PathBuf>,
}

impl FilePair {
    /// A pair reported under the new path, else the old one.
    #[must_use]
    pub fn new(old: Option<PathBuf>, new: Option<PathBuf>) -> Self {
        let path = new
            .as_deref()
            .or(old.as_deref())
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        Self { path, old, new }
    }

    /// Parse `OLD=NEW`; either side may be empty.
    pub fn parse(spec: &str) -> std::result::Result<Self, String> {
        let (old, new) = spec
            .split_once('=')
            .ok_or_else(|| format!("expected OLD=NEW, got '{spec}'"))?;
        let side = |s: &str| (!s.trim().is_empty()).then(|| PathBuf::from(s.trim()));
        let pair = Self::new(side(old), side(new));
        if pair.old.is_none() && pair.new.is_none() {
            return Err(format!("'{spec}' names neither an old nor a new file"));
        }
        Ok(pair)
    }
}

/// What happened to one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum UnitOutcome {
    Compared { result: DiffResult },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUnit {
    pub path: String,
    #[serde(flatten)]
    pub outcome: UnitOutcome,
}

impl BatchUnit {
    #[must_use]
    pub const fn result(&self) -> Option<&DiffResult> {
        match &self.outcome {
            UnitOutcome::Compared { result } => Some(result),
            UnitOutcome::Failed { .. } => None,
        }
    }
}

/// Success/failure breakdown plus change counts over successful units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_units: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub changes: DiffSummary,
}

impl BatchSummary {
    fn from_units(units: &[BatchUnit]) -> Self {
        let mut changes = DiffSummary::from_changes(&[]);
        let mut succeeded = 0;
        for result in units.iter().filter_map(BatchUnit::result) {
            succeeded += 1;
            changes.accumulate(&result.summary);
        }
        Self {
            total_units: units.len(),
            succeeded,
            failed: units.len() - succeeded,
            changes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub summary: BatchSummary,
    /// Units sorted by path
    pub units: Vec<BatchUnit>,
}

impl BatchResult {
    #[must_use]
    pub fn new(mut units: Vec<BatchUnit>) -> Self {
        units.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            summary: BatchSummary::from_units(&units),
            units,
        }
    }
}

impl ComparisonService {
    /// Compare many file pairs in parallel.
    ///
    /// Target configurations are resolved once up front; an unknown id fails
    /// the whole batch. Failures of individual units (unreadable files) are
    /// isolated and reported as `Failed` outcomes.
    pub fn compare_batch(&self, pairs: &[FilePair], targets: &[String]) -> Result<BatchResult> {
        let configurations = self.resolve_targets(targets)?;
        tracing::info!(units = pairs.len(), "comparing batch");

        let units: Vec<BatchUnit> = pairs
            .par_iter()
            .map(|pair| {
                let outcome = match self.compare_pair(pair, &configurations) {
                    Ok(result) => UnitOutcome::Compared { result },
                    Err(e) => {
                        tracing::warn!(path = %pair.path, "comparison failed: {e}");
                        UnitOutcome::Failed { error: e.to_string() }
                    }
                };
                BatchUnit {
                    path: pair.path.clone(),
                    outcome,
                }
            })
            .collect();

        Ok(BatchResult::new(units))
    }

    fn compare_pair(&self, pair: &FilePair, configurations: &[Configuration]) -> Result<DiffResult> {
        let read = |path: &Path| std::fs::read_to_string(path).map_err(|e| DeclDiffError::io(path, e));
        let old = pair.old.as_deref().map(read).transpose()?;
        let new = pair.new.as_deref().map(read).transpose()?;
        Ok(self.compare_resolved(&pair.path, old.as_deref(), new.as_deref(), configurations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::ChangeType;
    use tempfile::TempDir;

    #[test]
    fn test_parse_pair_spec() {
        let pair = FilePair::parse("old/A.cs=new/A.cs").unwrap();
        assert_eq!(pair.path, "new/A.cs");
        assert_eq!(pair.old, Some(PathBuf::from("old/A.cs")));

        let deleted = FilePair::parse("old/B.cs=").unwrap();
        assert_eq!(deleted.path, "old/B.cs");
        assert!(deleted.new.is_none());

        assert!(FilePair::parse("no-separator").is_err());
        assert!(FilePair::parse("=").is_err());
    }

    #[test]
    fn test_batch_isolates_failures_and_sorts() {
        let tmp = TempDir::new().unwrap();
        let write = |name: &str, text: &str| {
            let path = tmp.path().join(name);
            std::fs::write(&path, text).unwrap();
            path
        };
        let a_old = write("a_old.txt", "x\ny\n");
        let a_new = write("a_new.txt", "x\nz\n");
        let b_new = write("b_new.txt", "fresh\n");

        let pairs = vec![
            FilePair {
                path: "c".to_string(),
                old: Some(tmp.path().join("missing.txt")),
                new: Some(a_new.clone()),
            },
            FilePair {
                path: "b".to_string(),
                old: None,
                new: Some(b_new),
            },
            FilePair {
                path: "a".to_string(),
                old: Some(a_old),
                new: Some(a_new),
            },
        ];

        let service = ComparisonService::from_config(&AppConfig::default()).unwrap();
        let batch = service.compare_batch(&pairs, &[]).unwrap();

        let paths: Vec<&str> = batch.units.iter().map(|u| u.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
        assert_eq!(batch.summary.total_units, 3);
        assert_eq!(batch.summary.succeeded, 2);
        assert_eq!(batch.summary.failed, 1);
        assert!(matches!(batch.units[2].outcome, UnitOutcome::Failed { .. }));
        assert_eq!(batch.summary.changes.count_for_type(ChangeType::Modified), 1);
        assert_eq!(batch.summary.changes.count_for_type(ChangeType::Added), 1);
        assert_eq!(batch.summary.changes.total_changes, 2);
    }

    #[test]
    fn test_batch_rejects_unknown_configuration() {
        let service = ComparisonService::from_config(&AppConfig::default()).unwrap();
        assert!(service.compare_batch(&[], &["bogus".to_string()]).is_err());
    }
}

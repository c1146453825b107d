//! Diff result structures.

use crate::model::{Change, ChangeType, Impact};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete result of comparing one old/new pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct DiffResult {
    /// Compared file, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Configurations the result was computed under (empty for a single default run)
    #[serde(default)]
    pub analyzed_configurations: Vec<String>,
    /// Counts over the complete change tree
    pub summary: DiffSummary,
    /// Top-level changes
    pub changes: Vec<Change>,
}

impl DiffResult {
    /// Build a result and compute its summary.
    pub fn new(changes: Vec<Change>, analyzed_configurations: Vec<String>) -> Self {
        let summary = DiffSummary::from_changes(&changes);
        Self {
            path: None,
            analyzed_configurations,
            summary,
            changes,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Whether any change was reported
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.summary.total_changes > 0
    }

    /// Whether any change breaks the public or internal API
    #[must_use]
    pub const fn has_breaking_changes(&self) -> bool {
        self.summary.has_breaking_changes
    }

    /// Whether any change breaks the public API
    #[must_use]
    pub fn has_public_breaking_changes(&self) -> bool {
        self.summary.count_for_impact(Impact::BreakingPublicApi) > 0
    }

    /// Iterate over every change in the tree, depth first.
    pub fn iter_changes(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter().flat_map(Change::iter)
    }

    /// Keep changes whose own impact, or any descendant's, meets `min_impact`.
    ///
    /// The summary still describes the unfiltered tree.
    pub fn filtered(&self, min_impact: Impact) -> Self {
        Self {
            path: self.path.clone(),
            analyzed_configurations: self.analyzed_configurations.clone(),
            summary: self.summary.clone(),
            changes: filter_changes(&self.changes, min_impact),
        }
    }
}

fn filter_changes(changes: &[Change], min_impact: Impact) -> Vec<Change> {
    changes
        .iter()
        .filter(|c| c.max_impact() >= min_impact)
        .map(|c| Change {
            children: filter_changes(&c.children, min_impact),
            ..c.clone()
        })
        .collect()
}

/// Summary statistics for a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    /// Changes other than Unchanged, counted at every depth
    pub total_changes: usize,
    pub by_type: BTreeMap<ChangeType, usize>,
    /// Impact counts, excluding Unchanged entries
    pub by_impact: BTreeMap<Impact, usize>,
    pub has_breaking_changes: bool,
}

impl DiffSummary {
    /// Count every change in the tree once.
    #[must_use]
    pub fn from_changes(changes: &[Change]) -> Self {
        let mut by_type: BTreeMap<ChangeType, usize> = ChangeType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut by_impact: BTreeMap<Impact, usize> = Impact::ALL.iter().map(|i| (*i, 0)).collect();
        let mut total_changes = 0;

        for change in changes.iter().flat_map(Change::iter) {
            *by_type.entry(change.change_type).or_insert(0) += 1;
            if change.change_type != ChangeType::Unchanged {
                total_changes += 1;
                *by_impact.entry(change.impact).or_insert(0) += 1;
            }
        }

        let has_breaking_changes = by_impact
            .iter()
            .any(|(impact, count)| impact.is_breaking() && *count > 0);

        Self {
            total_changes,
            by_type,
            by_impact,
            has_breaking_changes,
        }
    }

    /// Add another summary's counts to this one.
    pub fn accumulate(&mut self, other: &Self) {
        self.total_changes += other.total_changes;
        for (change_type, count) in &other.by_type {
            *self.by_type.entry(*change_type).or_insert(0) += count;
        }
        for (impact, count) in &other.by_impact {
            *self.by_impact.entry(*impact).or_insert(0) += count;
        }
        self.has_breaking_changes |= other.has_breaking_changes;
    }

    #[must_use]
    pub fn count_for_type(&self, change_type: ChangeType) -> usize {
        self.by_type.get(&change_type).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn count_for_impact(&self, impact: Impact) -> usize {
        self.by_impact.get(&impact).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, StructuralNode, Visibility};

    fn change(name: &str, change_type: ChangeType, impact: Impact) -> Change {
        let node = StructuralNode::new(NodeKind::Method, Some(name), name).with_visibility(Visibility::Public);
        let base = match change_type {
            ChangeType::Added => Change::added(&node, "t"),
            ChangeType::Removed => Change::removed(&node, "t"),
            other => Change::between(other, &node, &node, name, name, "t"),
        };
        base.with_classification(impact, Vec::new())
    }

    #[test]
    fn test_summary_counts_nested_changes() {
        let parent = change("Type", ChangeType::Modified, Impact::NonBreaking).with_children(vec![
            change("A", ChangeType::Added, Impact::BreakingPublicApi),
            change("B", ChangeType::Unchanged, Impact::NonBreaking),
        ]);
        let result = DiffResult::new(vec![parent], Vec::new());
        assert_eq!(result.summary.total_changes, 2);
        assert_eq!(result.summary.count_for_type(ChangeType::Added), 1);
        assert_eq!(result.summary.count_for_type(ChangeType::Unchanged), 1);
        assert_eq!(result.summary.count_for_impact(Impact::BreakingPublicApi), 1);
        assert!(result.has_breaking_changes());
        assert!(result.has_public_breaking_changes());
    }

    #[test]
    fn test_filter_keeps_ancestors_of_qualifying_changes() {
        let parent = change("Type", ChangeType::Modified, Impact::NonBreaking).with_children(vec![
            change("A", ChangeType::Added, Impact::BreakingPublicApi),
            change("B", ChangeType::Modified, Impact::FormattingOnly),
        ]);
        let other = change("C", ChangeType::Modified, Impact::NonBreaking);
        let result = DiffResult::new(vec![parent, other], Vec::new());

        let filtered = result.filtered(Impact::BreakingPublicApi);
        assert_eq!(filtered.changes.len(), 1);
        assert_eq!(filtered.changes[0].children.len(), 1);
        assert_eq!(filtered.changes[0].children[0].display_name(), "A");
        // Counts are computed before filtering
        assert_eq!(filtered.summary, result.summary);
        assert_eq!(filtered.summary.total_changes, 4);
    }

    #[test]
    fn test_formatting_threshold_keeps_everything() {
        let result = DiffResult::new(
            vec![change("A", ChangeType::Modified, Impact::FormattingOnly)],
            Vec::new(),
        );
        assert_eq!(result.filtered(Impact::FormattingOnly).changes.len(), 1);
        assert!(result.filtered(Impact::NonBreaking).changes.is_empty());
    }
}

//! Multi-configuration merging.
//!
//! Source with conditional compilation can differ structurally per build
//! configuration. Each configuration is diffed independently; the
//! [`ConfigurationMerger`] then folds the runs into a single change tree in
//! which every change lists the configurations it applies to (an empty list
//! meaning all of them).

mod prescan;

pub use prescan::has_configuration_directives;

use crate::diff::DiffResult;
use crate::matching::NameComparison;
use crate::model::{Change, ChangeType, Location, NodeKind};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

/// The changes computed under one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationRun {
    pub configuration: String,
    pub changes: Vec<Change>,
}

impl ConfigurationRun {
    pub fn new(configuration: impl Into<String>, changes: Vec<Change>) -> Self {
        Self {
            configuration: configuration.into(),
            changes,
        }
    }
}

/// Identity of a logical change across configuration runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IdentityKey {
    change_type: ChangeType,
    kind: NodeKind,
    name: Option<String>,
    old_location: Option<SpanKey>,
    new_location: Option<SpanKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SpanKey {
    file: String,
    start_line: u32,
    end_line: u32,
    start_column: u32,
    end_column: u32,
}

impl SpanKey {
    fn new(location: &Location) -> Self {
        Self {
            // paths compare case-insensitively
            file: location.file.replace('\\', "/").to_lowercase(),
            start_line: location.start_line,
            end_line: location.end_line,
            start_column: location.start_column,
            end_column: location.end_column,
        }
    }
}

struct Group {
    representative: Change,
    configurations: BTreeSet<String>,
    pooled_children: Vec<(Change, BTreeSet<String>)>,
}

/// Folds per-configuration change trees into one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationMerger {
    name_comparison: NameComparison,
}

impl ConfigurationMerger {
    #[must_use]
    pub const fn new(name_comparison: NameComparison) -> Self {
        Self { name_comparison }
    }

    /// Merge configuration runs into one result.
    ///
    /// Runs are ordered by configuration id first, so the output does not
    /// depend on the order in which runs completed. Empty input yields an
    /// empty result.
    pub fn merge(&self, mut runs: Vec<ConfigurationRun>) -> DiffResult {
        runs.sort_by(|a, b| a.configuration.cmp(&b.configuration));
        let all: BTreeSet<String> = runs.iter().map(|r| r.configuration.clone()).collect();
        let analyzed: Vec<String> = all.iter().cloned().collect();

        if runs.len() <= 1 {
            let changes = runs
                .into_iter()
                .next()
                .map(|run| run.changes.into_iter().map(mark_universal).collect())
                .unwrap_or_default();
            return DiffResult::new(changes, analyzed);
        }

        let tagged: Vec<(Change, BTreeSet<String>)> = runs
            .into_iter()
            .flat_map(|run| {
                let tag = BTreeSet::from([run.configuration]);
                run.changes.into_iter().map(move |c| (c, tag.clone()))
            })
            .collect();

        let merged = self.merge_level(tagged, &all);
        tracing::debug!(
            configurations = all.len(),
            changes = merged.len(),
            "merged configuration runs"
        );
        DiffResult::new(merged, analyzed)
    }

    fn identity(&self, change: &Change) -> IdentityKey {
        IdentityKey {
            change_type: change.change_type,
            kind: change.kind,
            name: change.name.as_deref().map(|n| self.name_comparison.key(n)),
            old_location: change.old_location.as_ref().map(SpanKey::new),
            new_location: change.new_location.as_ref().map(SpanKey::new),
        }
    }

    /// Group one tree level across runs.
    ///
    /// Equal identities within a single run stay distinct: the n-th
    /// occurrence in one run only joins the n-th occurrence in another.
    fn merge_level(&self, items: Vec<(Change, BTreeSet<String>)>, all: &BTreeSet<String>) -> Vec<Change> {
        let mut groups: IndexMap<(IdentityKey, usize), Group> = IndexMap::new();
        let mut occurrences: HashMap<(IdentityKey, BTreeSet<String>), usize> = HashMap::new();

        for (mut change, tags) in items {
            let key = self.identity(&change);
            let seen = occurrences.entry((key.clone(), tags.clone())).or_default();
            let slot = (key, *seen);
            *seen += 1;

            let children = std::mem::take(&mut change.children);
            let group = groups.entry(slot).or_insert_with(|| Group {
                representative: change,
                configurations: BTreeSet::new(),
                pooled_children: Vec::new(),
            });
            group.configurations.extend(tags.iter().cloned());
            group
                .pooled_children
                .extend(children.into_iter().map(|child| (child, tags.clone())));
        }

        groups
            .into_values()
            .map(|group| {
                let children = self.merge_level(group.pooled_children, all);
                let applicable = if group.configurations == *all {
                    Vec::new()
                } else {
                    group.configurations.into_iter().collect()
                };
                Change {
                    applicable_configurations: applicable,
                    children,
                    ..group.representative
                }
            })
            .collect()
    }
}

fn mark_universal(mut change: Change) -> Change {
    change.applicable_configurations.clear();
    change.children = change.children.into_iter().map(mark_universal).collect();
    change
}

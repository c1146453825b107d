//! Move detection.
//!
//! Two passes: [`out_of_order`] finds matched pairs that were reordered within
//! one sibling list, and [`reconcile_cross_scope`] pairs a removed and an added
//! declaration with identical content living in different containers.

use super::whitespace::WhitespaceComparator;
use crate::classify::{ClassificationInput, ImpactClassifier};
use crate::matching::MatchedPair;
use crate::model::{Change, ChangeType};
use std::collections::{HashMap, HashSet};

/// Indices (into `pairs`) of the pairs that fall outside a longest increasing
/// subsequence of new positions, taken in old order.
///
/// Those are the minimal set of pairs that must be considered moved for the
/// remaining ones to keep their relative order.
#[must_use]
pub fn out_of_order(pairs: &[MatchedPair]) -> HashSet<usize> {
    let positions: Vec<usize> = pairs.iter().map(|p| p.new).collect();
    let keep = longest_increasing_subsequence(&positions);
    (0..pairs.len()).filter(|i| !keep.contains(i)).collect()
}

/// Patience-sorting LIS; returns the indices of one longest strictly
/// increasing subsequence. Ties favor the earliest elements.
fn longest_increasing_subsequence(values: &[usize]) -> HashSet<usize> {
    // tails[k] = index of the smallest tail of an increasing run of length k+1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; values.len()];

    for (i, &v) in values.iter().enumerate() {
        let pos = tails.partition_point(|&t| values[t] < v);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut keep = HashSet::new();
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        keep.insert(i);
        cursor = prev[i];
    }
    keep
}

/// Address of a change inside a forest: child indices from the root list.
type Address = Vec<usize>;

struct Candidate {
    address: Address,
    change: Change,
}

/// Replace Removed/Added leaf pairs that have the same kind, name and content
/// but different containers with a single cross-scope Moved change.
///
/// The Moved change takes the removed entry's position; the added entry is dropped.
#[must_use]
pub fn reconcile_cross_scope(
    changes: Vec<Change>,
    comparator: &WhitespaceComparator,
    classifier: &ImpactClassifier,
) -> Vec<Change> {
    let mut removed = Vec::new();
    let mut added = Vec::new();
    collect_leaves(&changes, &mut Vec::new(), &mut removed, &mut added);
    if removed.is_empty() || added.is_empty() {
        return changes;
    }

    let mut replacements: HashMap<Address, Change> = HashMap::new();
    let mut dropped: HashSet<Address> = HashSet::new();

    for old in &removed {
        let found = added.iter().position(|new| {
            !dropped.contains(&new.address)
                && new.change.kind == old.change.kind
                && new.change.name == old.change.name
                && new.change.scope != old.change.scope
                && match (&old.change.old_content, &new.change.new_content) {
                    (Some(a), Some(b)) => comparator.equivalent(a, b),
                    _ => false,
                }
        });
        let Some(idx) = found else {
            continue;
        };
        let new = &added[idx];
        tracing::debug!(
            name = new.change.display_name(),
            from = %old.change.scope,
            to = %new.change.scope,
            "detected move across containers"
        );
        dropped.insert(new.address.clone());
        replacements.insert(old.address.clone(), moved_between(&old.change, &new.change, classifier));
    }

    if replacements.is_empty() {
        return changes;
    }
    rebuild(changes, &mut Vec::new(), &mut replacements, &dropped)
}

fn moved_between(removed: &Change, added: &Change, classifier: &ImpactClassifier) -> Change {
    let visibility = added.visibility.or(removed.visibility);
    let classification =
        classifier.classify(&ClassificationInput::new(ChangeType::Moved, visibility).same_scope(false));
    Change {
        change_type: ChangeType::Moved,
        visibility,
        old_location: removed.old_location.clone(),
        old_content: removed.old_content.clone(),
        impact: classification.impact,
        caveats: classification.caveats,
        ..added.clone()
    }
}

fn collect_leaves(
    changes: &[Change],
    path: &mut Address,
    removed: &mut Vec<Candidate>,
    added: &mut Vec<Candidate>,
) {
    for (idx, change) in changes.iter().enumerate() {
        path.push(idx);
        if !change.kind.is_container() {
            let candidate = || Candidate {
                address: path.clone(),
                change: change.clone(),
            };
            match change.change_type {
                ChangeType::Removed => removed.push(candidate()),
                ChangeType::Added => added.push(candidate()),
                _ => {}
            }
        }
        collect_leaves(&change.children, path, removed, added);
        path.pop();
    }
}

fn rebuild(
    changes: Vec<Change>,
    path: &mut Address,
    replacements: &mut HashMap<Address, Change>,
    dropped: &HashSet<Address>,
) -> Vec<Change> {
    let mut out = Vec::with_capacity(changes.len());
    for (idx, mut change) in changes.into_iter().enumerate() {
        path.push(idx);
        if !dropped.contains(path.as_slice()) {
            if let Some(replacement) = replacements.remove(path.as_slice()) {
                change = replacement;
            } else {
                let children = std::mem::take(&mut change.children);
                change.children = rebuild(children, path, replacements, dropped);
            }
            out.push(change);
        }
        path.pop();
    }
    out
}

//! Recursive construction of the change tree.

use super::moves::{out_of_order, reconcile_cross_scope};
use super::whitespace::{detect_issues, WhitespaceComparator};
use crate::classify::{ClassificationInput, ImpactClassifier};
use crate::matching::string_similarity::{mask_identifier, parameter_renamed, same_apart_from_name};
use crate::matching::SiblingMatcher;
use crate::model::{Change, ChangeType, StructuralNode, Visibility};
use std::collections::{HashMap, HashSet};

/// Walks a matched old/new pair of trees and emits classified changes.
///
/// The matcher is invoked once per tree level. Output order is: matched and
/// removed entries in old declaration order, then added entries in new order.
pub(crate) struct TreeDiffer<'a> {
    pub matcher: &'a dyn SiblingMatcher,
    pub classifier: &'a ImpactClassifier,
    pub comparator: WhitespaceComparator,
    pub include_unchanged: bool,
    pub detect_moves: bool,
}

impl TreeDiffer<'_> {
    /// Diff two roots. Roots are paired unconditionally; their names are not compared.
    pub fn diff_root(&self, old: &StructuralNode, new: &StructuralNode) -> Vec<Change> {
        let changes = self.diff_pair(old, new, "", true, false);
        if self.detect_moves {
            reconcile_cross_scope(changes, &self.comparator, self.classifier)
        } else {
            changes
        }
    }

    /// Changes for a tree whose counterpart does not exist.
    pub fn whole_added(&self, new: &StructuralNode) -> Change {
        self.added(new, "")
    }

    pub fn whole_removed(&self, old: &StructuralNode) -> Change {
        self.removed(old, "")
    }

    fn names_differ(&self, old: &StructuralNode, new: &StructuralNode) -> bool {
        match (old.name.as_deref(), new.name.as_deref()) {
            (Some(a), Some(b)) => !self.matcher.names_equal(a, b),
            (None, None) => false,
            _ => true,
        }
    }

    fn diff_pair(
        &self,
        old: &StructuralNode,
        new: &StructuralNode,
        scope: &str,
        root: bool,
        moved: bool,
    ) -> Vec<Change> {
        let renamed = !root && self.names_differ(old, new);
        if old.kind.is_container() && new.kind.is_container() {
            self.diff_container(old, new, scope, renamed, moved)
        } else {
            self.diff_leaf(old, new, scope, renamed, moved)
        }
    }

    fn diff_container(
        &self,
        old: &StructuralNode,
        new: &StructuralNode,
        scope: &str,
        renamed: bool,
        moved: bool,
    ) -> Vec<Change> {
        let children = self.diff_children(&old.children, &new.children, &child_scope(scope, new));

        let own_type = if renamed {
            Some(ChangeType::Renamed)
        } else if old.signature != new.signature {
            Some(ChangeType::Modified)
        } else if moved && self.comparator.equivalent(&old.raw_text, &new.raw_text) {
            Some(ChangeType::Moved)
        } else if self.include_unchanged {
            Some(ChangeType::Unchanged)
        } else {
            None
        };

        match own_type {
            // A container's own content is its header.
            Some(change_type) => {
                let own = self
                    .between(change_type, old, new, &old.signature, &new.signature, scope)
                    .with_children(children);
                let mut out = vec![own];
                if renamed && header_changed(old, new) {
                    out.push(self.between(
                        ChangeType::Modified,
                        old,
                        new,
                        &old.signature,
                        &new.signature,
                        scope,
                    ));
                }
                out
            }
            // Unchanged header: nested changes surface at this level.
            None => children,
        }
    }

    fn diff_leaf(
        &self,
        old: &StructuralNode,
        new: &StructuralNode,
        scope: &str,
        renamed: bool,
        moved: bool,
    ) -> Vec<Change> {
        let change_type = if renamed {
            ChangeType::Renamed
        } else if !self.comparator.equivalent(&old.raw_text, &new.raw_text) {
            ChangeType::Modified
        } else if moved {
            ChangeType::Moved
        } else if self.include_unchanged {
            ChangeType::Unchanged
        } else {
            return Vec::new();
        };

        let mut out = vec![self.leaf_change(change_type, old, new, scope)];
        // A rename does not hide edits to the rest of the declaration.
        if renamed && self.text_changed_beyond_name(old, new) {
            out.push(self.leaf_change(ChangeType::Modified, old, new, scope));
        }
        out
    }

    fn leaf_change(&self, change_type: ChangeType, old: &StructuralNode, new: &StructuralNode, scope: &str) -> Change {
        let change = self.between(change_type, old, new, &old.raw_text, &new.raw_text, scope);
        if self.comparator.reports_issues() && change_type != ChangeType::Unchanged {
            change.with_whitespace_issues(detect_issues(Some(&old.raw_text), &new.raw_text))
        } else {
            change
        }
    }

    fn text_changed_beyond_name(&self, old: &StructuralNode, new: &StructuralNode) -> bool {
        !self.comparator.equivalent(
            &mask_identifier(&old.raw_text, old.name_or_empty()),
            &mask_identifier(&new.raw_text, new.name_or_empty()),
        )
    }

    fn diff_children(&self, olds: &[StructuralNode], news: &[StructuralNode], scope: &str) -> Vec<Change> {
        let result = self.matcher.match_siblings(olds, news);
        let moved: HashSet<usize> = if self.detect_moves {
            out_of_order(&result.matched)
        } else {
            HashSet::new()
        };
        let pair_of: HashMap<usize, usize> = result
            .matched
            .iter()
            .enumerate()
            .map(|(k, pair)| (pair.old, k))
            .collect();

        let mut out = Vec::new();
        for (o, old) in olds.iter().enumerate() {
            match pair_of.get(&o) {
                Some(&k) => {
                    let new = &news[result.matched[k].new];
                    out.extend(self.diff_pair(old, new, scope, false, moved.contains(&k)));
                }
                None => out.push(self.removed(old, scope)),
            }
        }
        out.extend(result.unmatched_new.iter().map(|&n| self.added(&news[n], scope)));
        out
    }

    fn between(
        &self,
        change_type: ChangeType,
        old: &StructuralNode,
        new: &StructuralNode,
        old_content: &str,
        new_content: &str,
        scope: &str,
    ) -> Change {
        let change = Change::between(change_type, old, new, old_content, new_content, scope);
        let modified = change_type == ChangeType::Modified;
        // Rated by the wider side, so narrowing a public declaration still breaks callers.
        let input = ClassificationInput::new(change_type, exposure(old.visibility, new.visibility))
            .formatting_only(modified && self.comparator.formatting_only(old_content, new_content))
            .signature_changed(modified && header_changed(old, new))
            .same_scope(change_type == ChangeType::Moved)
            .parameter_renamed(
                matches!(change_type, ChangeType::Modified | ChangeType::Renamed)
                    && new.kind.is_member()
                    && parameter_renamed(&old.signature, &new.signature),
            );
        let classification = self.classifier.classify(&input);
        change.with_classification(classification.impact, classification.caveats)
    }

    fn added(&self, node: &StructuralNode, scope: &str) -> Change {
        let classification = self
            .classifier
            .classify(&ClassificationInput::new(ChangeType::Added, node.visibility));
        let change = Change::added(node, scope).with_classification(classification.impact, classification.caveats);
        if self.comparator.reports_issues() {
            change.with_whitespace_issues(detect_issues(None, &node.raw_text))
        } else {
            change
        }
    }

    fn removed(&self, node: &StructuralNode, scope: &str) -> Change {
        let classification = self
            .classifier
            .classify(&ClassificationInput::new(ChangeType::Removed, node.visibility));
        Change::removed(node, scope).with_classification(classification.impact, classification.caveats)
    }
}

/// True when the headers differ in more than the declared name.
fn header_changed(old: &StructuralNode, new: &StructuralNode) -> bool {
    !same_apart_from_name(&old.signature, old.name_or_empty(), &new.signature, new.name_or_empty())
}

fn exposure(old: Option<Visibility>, new: Option<Visibility>) -> Option<Visibility> {
    match (old, new) {
        (Some(a), Some(b)) => Some(a.wider(b)),
        (a, b) => b.or(a),
    }
}

/// Container path used to tell same-scope from cross-scope moves.
fn child_scope(scope: &str, container: &StructuralNode) -> String {
    let segment = format!("{}:{}", container.kind, container.name_or_empty());
    if scope.is_empty() {
        segment
    } else {
        format!("{scope}/{segment}")
    }
}

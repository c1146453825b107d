//! The sibling matching cascade.

use super::config::{MatchingOptions, TypeMatchingMode};
use super::string_similarity::{same_apart_from_name, text_similarity};
use super::traits::{MatchResult, MatchStrategy, MatchedPair, SiblingMatcher};
use crate::error::Result;
use crate::model::{NodeKind, StructuralNode};
use indexmap::IndexMap;
use similar::{capture_diff_slices, Algorithm, DiffOp};

/// Pairs sibling nodes using a fixed strategy cascade.
///
/// Each stage only sees nodes left unpaired by earlier stages:
///
/// 1. exact kind + name (single candidates on both sides)
/// 2. overload groups: identical signature first, then position in the group
/// 3. type declarations: capability marker and/or text similarity
/// 4. named members identical apart from their name (renames)
/// 5. unnamed nodes aligned per kind by a Myers diff over signatures
///
/// Ties are broken by declaration order only.
#[derive(Debug, Clone)]
pub struct NodeMatcher {
    options: MatchingOptions,
}

impl NodeMatcher {
    /// Create a matcher, validating the options.
    pub fn new(options: MatchingOptions) -> Result<Self> {
        options.check()?;
        Ok(Self { options })
    }

    #[must_use]
    pub const fn options(&self) -> &MatchingOptions {
        &self.options
    }

    fn name_key(&self, node: &StructuralNode) -> Option<String> {
        node.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| self.options.name_comparison.key(n))
    }

    fn match_by_name(&self, state: &mut MatchState<'_>) {
        let (olds, news) = (state.old, state.new);
        let mut old_groups: IndexMap<(NodeKind, String), Vec<usize>> = IndexMap::new();
        let mut new_groups: IndexMap<(NodeKind, String), Vec<usize>> = IndexMap::new();
        for (idx, node) in olds.iter().enumerate() {
            if let Some(key) = self.name_key(node) {
                old_groups.entry((node.kind, key)).or_default().push(idx);
            }
        }
        for (idx, node) in news.iter().enumerate() {
            if let Some(key) = self.name_key(node) {
                new_groups.entry((node.kind, key)).or_default().push(idx);
            }
        }

        for (key, old_idx) in &old_groups {
            let Some(new_idx) = new_groups.get(key) else {
                continue;
            };
            if old_idx.len() == 1 && new_idx.len() == 1 {
                state.pair(old_idx[0], new_idx[0], MatchStrategy::ExactName);
                continue;
            }

            // Overload group: identical signatures first.
            for &o in old_idx {
                let sig = &olds[o].signature;
                let found = new_idx
                    .iter()
                    .copied()
                    .find(|&n| !state.new_used[n] && news[n].signature == *sig);
                if let Some(n) = found {
                    state.pair(o, n, MatchStrategy::Signature);
                }
            }
            // Then by position among what is left of the group.
            let rest_old: Vec<usize> = old_idx.iter().copied().filter(|&o| !state.old_used[o]).collect();
            let rest_new: Vec<usize> = new_idx.iter().copied().filter(|&n| !state.new_used[n]).collect();
            for (o, n) in rest_old.into_iter().zip(rest_new) {
                state.pair(o, n, MatchStrategy::OverloadPosition);
            }
        }
    }

    fn match_types(&self, state: &mut MatchState<'_>) {
        let marker = self
            .options
            .capability_marker
            .as_deref()
            .filter(|m| !m.is_empty());
        let (use_capability, use_similarity) = match self.options.type_matching {
            TypeMatchingMode::ExactName => return,
            TypeMatchingMode::Capability => (marker.is_some(), false),
            TypeMatchingMode::Similarity => (false, true),
            TypeMatchingMode::Auto => (marker.is_some(), true),
        };

        let has_marker = |node: &StructuralNode| {
            marker.is_some_and(|m| {
                node.declared_bases()
                    .iter()
                    .any(|b| self.options.name_comparison.names_equal(b, m))
            })
        };

        let (olds, news) = (state.old, state.new);
        for (o, old) in olds.iter().enumerate() {
            if state.old_used[o] || old.kind != NodeKind::Type {
                continue;
            }
            let open: Vec<usize> = (0..news.len())
                .filter(|&n| !state.new_used[n] && news[n].kind == NodeKind::Type)
                .collect();

            let mut found = None;
            if use_capability && has_marker(old) {
                found = open
                    .iter()
                    .copied()
                    .find(|&n| has_marker(&news[n]))
                    .map(|n| (n, MatchStrategy::Capability));
            }
            if found.is_none() && use_similarity {
                let threshold = self.options.similarity_threshold;
                found = open
                    .iter()
                    .copied()
                    .find(|&n| text_similarity(&old.raw_text, &news[n].raw_text) >= threshold)
                    .map(|n| (n, MatchStrategy::Similarity));
            }

            if let Some((n, strategy)) = found {
                tracing::debug!(
                    old = old.name_or_empty(),
                    new = news[n].name_or_empty(),
                    ?strategy,
                    "paired renamed type declaration"
                );
                state.pair(o, n, strategy);
            }
        }
    }

    fn match_renames(&self, state: &mut MatchState<'_>) {
        if !self.options.detect_renames {
            return;
        }
        let (olds, news) = (state.old, state.new);
        for (o, old) in olds.iter().enumerate() {
            if state.old_used[o] || old.kind == NodeKind::Type || self.name_key(old).is_none() {
                continue;
            }
            let found = news.iter().enumerate().position(|(n, new)| {
                !state.new_used[n]
                    && new.kind == old.kind
                    && self.name_key(new).is_some()
                    && same_apart_from_name(
                        &old.raw_text,
                        old.name_or_empty(),
                        &new.raw_text,
                        new.name_or_empty(),
                    )
            });
            if let Some(n) = found {
                state.pair(o, n, MatchStrategy::Rename);
            }
        }
    }

    fn align_unnamed(&self, state: &mut MatchState<'_>) {
        let (olds, news) = (state.old, state.new);
        let mut kinds: Vec<NodeKind> = Vec::new();
        for node in olds.iter().chain(news.iter()) {
            if self.name_key(node).is_none() && !kinds.contains(&node.kind) {
                kinds.push(node.kind);
            }
        }

        for kind in kinds {
            let old_idx: Vec<usize> = (0..olds.len())
                .filter(|&i| !state.old_used[i] && olds[i].kind == kind && self.name_key(&olds[i]).is_none())
                .collect();
            let new_idx: Vec<usize> = (0..news.len())
                .filter(|&i| !state.new_used[i] && news[i].kind == kind && self.name_key(&news[i]).is_none())
                .collect();
            if old_idx.is_empty() || new_idx.is_empty() {
                continue;
            }

            let old_sigs: Vec<&str> = old_idx.iter().map(|&i| olds[i].signature.as_str()).collect();
            let new_sigs: Vec<&str> = new_idx.iter().map(|&i| news[i].signature.as_str()).collect();

            for op in capture_diff_slices(Algorithm::Myers, &old_sigs, &new_sigs) {
                match op {
                    DiffOp::Equal {
                        old_index,
                        new_index,
                        len,
                    } => {
                        for k in 0..len {
                            state.pair(old_idx[old_index + k], new_idx[new_index + k], MatchStrategy::Sequence);
                        }
                    }
                    DiffOp::Replace {
                        old_index,
                        old_len,
                        new_index,
                        new_len,
                    } => {
                        for k in 0..old_len.min(new_len) {
                            state.pair(old_idx[old_index + k], new_idx[new_index + k], MatchStrategy::Sequence);
                        }
                    }
                    DiffOp::Delete { .. } | DiffOp::Insert { .. } => {}
                }
            }
        }
    }
}

impl Default for NodeMatcher {
    fn default() -> Self {
        Self {
            options: MatchingOptions::default(),
        }
    }
}

impl SiblingMatcher for NodeMatcher {
    fn match_siblings(&self, old: &[StructuralNode], new: &[StructuralNode]) -> MatchResult {
        let mut state = MatchState::new(old, new);

        self.match_by_name(&mut state);
        self.match_types(&mut state);
        self.match_renames(&mut state);
        self.align_unnamed(&mut state);

        state.finish()
    }

    fn names_equal(&self, a: &str, b: &str) -> bool {
        self.options.name_comparison.names_equal(a, b)
    }
}

/// Bookkeeping shared by the cascade stages.
struct MatchState<'a> {
    old: &'a [StructuralNode],
    new: &'a [StructuralNode],
    old_used: Vec<bool>,
    new_used: Vec<bool>,
    matched: Vec<MatchedPair>,
}

impl<'a> MatchState<'a> {
    fn new(old: &'a [StructuralNode], new: &'a [StructuralNode]) -> Self {
        Self {
            old,
            new,
            old_used: vec![false; old.len()],
            new_used: vec![false; new.len()],
            matched: Vec::new(),
        }
    }

    fn pair(&mut self, old: usize, new: usize, strategy: MatchStrategy) {
        debug_assert!(!self.old_used[old] && !self.new_used[new]);
        self.old_used[old] = true;
        self.new_used[new] = true;
        self.matched.push(MatchedPair { old, new, strategy });
    }

    fn finish(mut self) -> MatchResult {
        self.matched.sort_by_key(|p| p.old);
        MatchResult {
            matched: self.matched,
            unmatched_old: (0..self.old.len()).filter(|&i| !self.old_used[i]).collect(),
            unmatched_new: (0..self.new.len()).filter(|&i| !self.new_used[i]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::NameComparison;
    use crate::model::Visibility;

    fn method(name: &str, text: &str) -> StructuralNode {
        StructuralNode::new(NodeKind::Method, Some(name), text).with_visibility(Visibility::Public)
    }

    fn matcher() -> NodeMatcher {
        NodeMatcher::new(MatchingOptions::default()).expect("valid options")
    }

    #[test]
    fn test_exact_name_pairs_reordered_members() {
        let old = vec![method("A", "void A() {}"), method("B", "void B() {}")];
        let new = vec![method("B", "void B() {}"), method("A", "void A() {}")];
        let result = matcher().match_siblings(&old, &new);
        assert_eq!(result.matched.len(), 2);
        assert_eq!(result.matched[0].old, 0);
        assert_eq!(result.matched[0].new, 1);
        assert_eq!(result.matched[0].strategy, MatchStrategy::ExactName);
        assert!(result.unmatched_old.is_empty());
        assert!(result.unmatched_new.is_empty());
    }

    #[test]
    fn test_overloads_pair_by_signature_then_position() {
        let old = vec![
            method("Run", "void Run(int a)").with_signature("void Run(int a)"),
            method("Run", "void Run(string s)").with_signature("void Run(string s)"),
        ];
        let new = vec![
            method("Run", "void Run(string s)").with_signature("void Run(string s)"),
            method("Run", "void Run(long a)").with_signature("void Run(long a)"),
        ];
        let result = matcher().match_siblings(&old, &new);
        let by_old: Vec<_> = result.matched.iter().map(|p| (p.old, p.new, p.strategy)).collect();
        assert_eq!(
            by_old,
            vec![
                (0, 1, MatchStrategy::OverloadPosition),
                (1, 0, MatchStrategy::Signature),
            ]
        );
    }

    #[test]
    fn test_case_insensitive_policy() {
        let old = vec![method("process", "void process() {}")];
        let new = vec![method("Process", "void Process() {}")];

        let sensitive = NodeMatcher::new(MatchingOptions {
            detect_renames: false,
            ..MatchingOptions::default()
        })
        .expect("valid options");
        assert!(sensitive.match_siblings(&old, &new).matched.is_empty());

        let insensitive = NodeMatcher::new(MatchingOptions {
            name_comparison: NameComparison::CaseInsensitive,
            ..MatchingOptions::default()
        })
        .expect("valid options");
        let result = insensitive.match_siblings(&old, &new);
        assert_eq!(result.matched[0].strategy, MatchStrategy::ExactName);
    }

    #[test]
    fn test_capability_matching_for_types() {
        let old = vec![StructuralNode::new(NodeKind::Type, Some("OrderHandler"), "class OrderHandler : IHandler { }")];
        let new = vec![
            StructuralNode::new(NodeKind::Type, Some("Unrelated"), "class Unrelated { }"),
            StructuralNode::new(NodeKind::Type, Some("PurchaseHandler"), "class PurchaseHandler : IHandler { }"),
        ];
        let matcher = NodeMatcher::new(MatchingOptions {
            type_matching: TypeMatchingMode::Capability,
            capability_marker: Some("IHandler".to_string()),
            ..MatchingOptions::default()
        })
        .expect("valid options");
        let result = matcher.match_siblings(&old, &new);
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].new, 1);
        assert_eq!(result.matched[0].strategy, MatchStrategy::Capability);
        assert_eq!(result.unmatched_new, vec![0]);
    }

    #[test]
    fn test_similarity_matching_respects_threshold() {
        let old = vec![StructuralNode::new(
            NodeKind::Type,
            Some("CustomerRepository"),
            "public class CustomerRepository { public void Save(Customer c) { } }",
        )];
        let new = vec![StructuralNode::new(
            NodeKind::Type,
            Some("ClientRepository"),
            "public class ClientRepository { public void Save(Customer c) { } }",
        )];
        let result = matcher().match_siblings(&old, &new);
        assert_eq!(result.matched[0].strategy, MatchStrategy::Similarity);

        let strict = NodeMatcher::new(MatchingOptions {
            similarity_threshold: 0.99,
            ..MatchingOptions::default()
        })
        .expect("valid options");
        let result = strict.match_siblings(&old, &new);
        assert!(result.matched.is_empty());
        assert_eq!(result.unmatched_old, vec![0]);
        assert_eq!(result.unmatched_new, vec![0]);
    }

    #[test]
    fn test_rename_detection_for_fields() {
        let old = vec![StructuralNode::new(NodeKind::Field, Some("_count"), "private int _count = 0;")];
        let new = vec![StructuralNode::new(NodeKind::Field, Some("_counter"), "private int _counter = 0;")];
        let result = matcher().match_siblings(&old, &new);
        assert_eq!(result.matched[0].strategy, MatchStrategy::Rename);
    }

    #[test]
    fn test_unnamed_nodes_align_by_sequence() {
        let line = |t: &str| StructuralNode::new(NodeKind::Line, None, t);
        let old = vec![line("a"), line("b"), line("c")];
        let new = vec![line("a"), line("x"), line("b"), line("c")];
        let result = matcher().match_siblings(&old, &new);
        let pairs: Vec<_> = result.matched.iter().map(|p| (p.old, p.new)).collect();
        assert_eq!(pairs, vec![(0, 0), (1, 2), (2, 3)]);
        assert_eq!(result.unmatched_new, vec![1]);
    }

    #[test]
    fn test_every_index_accounted_for_once() {
        let old = vec![method("A", "a"), method("B", "b"), method("C", "c")];
        let new = vec![method("C", "c"), method("D", "d")];
        let result = matcher().match_siblings(&old, &new);
        let mut olds: Vec<usize> = result.matched.iter().map(|p| p.old).collect();
        olds.extend(&result.unmatched_old);
        olds.sort_unstable();
        assert_eq!(olds, vec![0, 1, 2]);
        let mut news: Vec<usize> = result.matched.iter().map(|p| p.new).collect();
        news.extend(&result.unmatched_new);
        news.sort_unstable();
        assert_eq!(news, vec![0, 1]);
    }
}

//! Trait definitions for sibling matching strategies.
//!
//! The diff builder depends on [`SiblingMatcher`] only, so alternative
//! matchers (or test doubles) can be injected.

use crate::model::StructuralNode;

/// Strategy that paired two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MatchStrategy {
    /// Same kind and name
    ExactName,
    /// Overload group member paired by identical signature
    Signature,
    /// Overload group member paired by position within the group
    OverloadPosition,
    /// Type declarations sharing the capability marker
    Capability,
    /// Type declarations with similar normalized text
    Similarity,
    /// Named member whose text is identical apart from its name
    Rename,
    /// Unnamed node aligned by sequence diff
    Sequence,
}

/// One paired old/new sibling, by index into the sibling slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    pub old: usize,
    pub new: usize,
    pub strategy: MatchStrategy,
}

/// Outcome of matching one level of siblings.
///
/// `matched` is ordered by old index; the unmatched lists keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct MatchResult {
    pub matched: Vec<MatchedPair>,
    pub unmatched_old: Vec<usize>,
    pub unmatched_new: Vec<usize>,
}

/// Trait for pairing the children of two matched parents.
pub trait SiblingMatcher: Send + Sync {
    /// Pair `old` against `new`. Every index appears exactly once across the
    /// matched and unmatched lists.
    fn match_siblings(&self, old: &[StructuralNode], new: &[StructuralNode]) -> MatchResult;

    /// Whether two names are equal under the matcher's policy.
    fn names_equal(&self, a: &str, b: &str) -> bool;
}

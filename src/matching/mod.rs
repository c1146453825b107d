//! Sibling matching for structural trees.
//!
//! The diff builder calls the matcher once per tree level to decide which old
//! node corresponds to which new node. Matching is structural (kind, name,
//! signature, text) and never relies on node identity.
//!
//! # Example
//!
//! ```ignore
//! use decldiff::matching::{MatchingOptions, NodeMatcher, SiblingMatcher};
//!
//! let matcher = NodeMatcher::new(MatchingOptions::default())?;
//! let result = matcher.match_siblings(&old.children, &new.children);
//! for pair in &result.matched {
//!     println!("{} -> {} via {:?}", pair.old, pair.new, pair.strategy);
//! }
//! ```

mod config;
mod matcher;
pub mod string_similarity;
mod traits;

pub use config::{MatchingOptions, NameComparison, TypeMatchingMode, DEFAULT_SIMILARITY_THRESHOLD};
pub use matcher::NodeMatcher;
pub use traits::{MatchResult, MatchStrategy, MatchedPair, SiblingMatcher};

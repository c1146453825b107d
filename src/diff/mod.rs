//! Hierarchical structural diff.
//!
//! The engine pairs the two roots, asks the matcher to pair each level of
//! children, and recurses into matched pairs. Every emitted [`Change`] is
//! classified on construction.
//!
//! - Unmatched old nodes become `Removed`, unmatched new nodes `Added`
//!   (with their full text, never decomposed).
//! - Containers (files, namespaces, types) compare their header only; child
//!   differences attach below the container's own change, or surface at the
//!   enclosing level when the header is unchanged.
//! - Reordered siblings with identical content become same-scope `Moved`
//!   changes; identical declarations removed from one container and added to
//!   another become a single cross-scope `Moved`.
//!
//! [`Change`]: crate::model::Change
//!
//! # Example
//!
//! ```ignore
//! use decldiff::diff::{DiffEngine, WhitespaceMode};
//!
//! let engine = DiffEngine::new().whitespace_mode(WhitespaceMode::LanguageAware);
//! let result = engine.diff(&old_tree, &new_tree);
//! println!("{} changes", result.summary.total_changes);
//! ```

mod builder;
mod engine;
pub mod moves;
mod result;
pub mod whitespace;

pub use engine::{DiffEngine, DiffOptions};
pub use result::{DiffResult, DiffSummary};
pub use whitespace::{Language, WhitespaceComparator, WhitespaceMode};

//! Source parsers.
//!
//! Parsers turn source text into [`StructuralNode`] trees. Language front
//! ends are external collaborators; the crate ships two:
//!
//! - [`LineParser`]: one node per line, evaluating `#if`-family directives
//!   under a build configuration
//! - [`JsonTreeParser`]: reads a tree serialized by another tool
//!
//! [`ParserRegistry`] picks between them by confidence when the parser kind
//! is `Auto`.
//!
//! [`StructuralNode`]: crate::model::StructuralNode

mod conditional;
mod detection;
mod json_tree;
mod line;
mod traits;

pub use detection::{ParserKind, ParserRegistry};
pub use json_tree::JsonTreeParser;
pub use line::LineParser;
pub use traits::{FormatConfidence, SourceParser};

//! Data model shared by parsers, the diff engine and reporters.
//!
//! [`StructuralNode`] is the input contract: every parser lowers its syntax
//! tree onto this closed set of node kinds. [`Change`] is the output: an owned,
//! fully classified tree of differences that reporters serialize as-is.

mod change;
mod node;

pub use change::*;
pub use node::*;

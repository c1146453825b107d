//! Shared utilities.

mod hash;

pub use hash::tree_hash;

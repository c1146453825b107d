//! Content hashing utilities.

use crate::model::StructuralNode;
use xxhash_rust::xxh3::Xxh3;

/// Hash a structural tree: kinds, names, visibility, signatures and raw text.
///
/// Spans are excluded, so identical trees at different offsets hash equal.
pub fn tree_hash(node: &StructuralNode) -> u64 {
    let mut hasher = Xxh3::new();
    feed(&mut hasher, node);
    hasher.digest()
}

fn feed(hasher: &mut Xxh3, node: &StructuralNode) {
    hasher.update(node.kind.as_str().as_bytes());
    hasher.update(&[0]);
    hasher.update(node.name_or_empty().as_bytes());
    hasher.update(&[0]);
    hasher.update(node.visibility.map_or("", |v| v.as_str()).as_bytes());
    hasher.update(&[0]);
    hasher.update(node.signature.as_bytes());
    hasher.update(&[0]);
    hasher.update(node.raw_text.as_bytes());
    hasher.update(&(node.children.len() as u64).to_le_bytes());
    for child in &node.children {
        feed(hasher, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, Span};

    #[test]
    fn test_tree_hash_ignores_spans() {
        let a = StructuralNode::new(NodeKind::Method, Some("Run"), "void Run() {}")
            .with_span(Span::new("a.cs", 1, 1));
        let b = StructuralNode::new(NodeKind::Method, Some("Run"), "void Run() {}")
            .with_span(Span::new("a.cs", 10, 10));
        assert_eq!(tree_hash(&a), tree_hash(&b));

        let c = StructuralNode::new(NodeKind::Method, Some("Run"), "void Run() { x(); }");
        assert_ne!(tree_hash(&a), tree_hash(&c));
    }
}

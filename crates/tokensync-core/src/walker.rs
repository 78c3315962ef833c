//! Token tree flattening

use std::collections::HashSet;

use tokensync_model::{Namespace, TokenLeaf, TokenNode, join_flat_key};

/// A leaf together with its `/`-joined path inside the group
#[derive(Debug, Clone, PartialEq)]
pub struct FlatToken<'a> {
    pub key: String,
    pub leaf: &'a TokenLeaf,
}

/// Flatten a group's namespace depth-first, visiting keys in sorted order.
///
/// Documents are decoded without preserving key order, so when two leaves
/// flatten to the same key the one whose path sorts last is visited last.
/// Metadata keys never reach the namespace, so every visited leaf is a token.
pub fn flatten(root: &Namespace) -> Vec<FlatToken<'_>> {
    let mut tokens = Vec::new();
    walk(root, "", &mut tokens);
    tokens
}

fn walk<'a>(namespace: &'a Namespace, prefix: &str, out: &mut Vec<FlatToken<'a>>) {
    for (name, node) in &namespace.children {
        let key = join_flat_key(prefix, name);
        match node {
            TokenNode::Leaf(leaf) => out.push(FlatToken { key, leaf }),
            TokenNode::Namespace(child) => walk(child, &key, out),
        }
    }
}

/// Keys produced by more than one leaf, in order of first repetition
pub fn duplicate_keys(tokens: &[FlatToken<'_>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for token in tokens {
        if !seen.insert(token.key.as_str()) && reported.insert(token.key.as_str()) {
            duplicates.push(token.key.clone());
        }
    }
    duplicates
}

//! Decide whether a fresh export differs from what the remote holds

use serde_json::Value;
use sha2::{Digest, Sha256};
use similar::TextDiff;
use tokensync_model::VALUE_KEY;

/// Maximum recursion depth for diff operations
const MAX_DIFF_DEPTH: usize = 128;

/// SHA-256 of the content, hex encoded
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A token-level change between two documents.
///
/// Paths use the alias form, `Group.path.to.token`.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticChange {
    Added { path: String, value: Value },
    Removed { path: String, value: Value },
    Modified { path: String, old: Value, new: Value },
}

impl SemanticChange {
    pub fn path(&self) -> &str {
        match self {
            SemanticChange::Added { path, .. }
            | SemanticChange::Removed { path, .. }
            | SemanticChange::Modified { path, .. } => path,
        }
    }
}

/// How the fresh content differs from the previous content
#[derive(Debug, Clone, PartialEq)]
pub struct ContentChange {
    pub previous_checksum: Option<String>,
    pub checksum: String,
    /// Token-level changes; empty when either side is not valid JSON or the
    /// difference is formatting only
    pub changes: Vec<SemanticChange>,
    /// Line similarity ratio (0.0 to 1.0)
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Byte-identical; nothing to write
    Unchanged,
    Changed(ContentChange),
}

impl GateDecision {
    pub fn is_changed(&self) -> bool {
        matches!(self, GateDecision::Changed(_))
    }
}

/// Compares exports by checksum, so only a real change reaches the remote
pub struct DiffGate;

impl DiffGate {
    /// Compare `fresh` against `previous`, which is `None` when there is no
    /// earlier content at all
    pub fn evaluate(previous: Option<&str>, fresh: &str) -> GateDecision {
        let checksum = compute_checksum(fresh);
        let previous_checksum = previous.map(compute_checksum);

        if previous_checksum.as_deref() == Some(checksum.as_str()) {
            tracing::debug!(%checksum, "Content unchanged");
            return GateDecision::Unchanged;
        }

        let old_text = previous.unwrap_or_default();
        let similarity = TextDiff::from_lines(old_text, fresh).ratio() as f64;
        let changes = match (
            previous.and_then(|p| serde_json::from_str::<Value>(p).ok()),
            serde_json::from_str::<Value>(fresh).ok(),
        ) {
            (Some(old), Some(new)) => diff_tokens(&old, &new),
            (None, Some(new)) if previous.is_none() => diff_tokens(&Value::Null, &new),
            _ => Vec::new(),
        };

        GateDecision::Changed(ContentChange {
            previous_checksum,
            checksum,
            changes,
            similarity,
        })
    }
}

/// Token-level diff of two documents
pub fn diff_tokens(old: &Value, new: &Value) -> Vec<SemanticChange> {
    let mut changes = Vec::new();
    diff_values_with_depth(old, new, String::new(), &mut changes, 0);
    changes
}

fn is_token(value: &Value) -> bool {
    value.as_object().is_some_and(|o| o.contains_key(VALUE_KEY))
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Recursive diff that stops at tokens, reporting whole tokens as changed
fn diff_values_with_depth(
    old: &Value,
    new: &Value,
    path: String,
    changes: &mut Vec<SemanticChange>,
    depth: usize,
) {
    if old == new {
        return;
    }

    match (old, new) {
        (Value::Object(old_obj), Value::Object(new_obj))
            if depth <= MAX_DIFF_DEPTH && !is_token(old) && !is_token(new) =>
        {
            for (key, old_value) in old_obj {
                let child = child_path(&path, key);
                match new_obj.get(key) {
                    Some(new_value) => {
                        diff_values_with_depth(old_value, new_value, child, changes, depth + 1)
                    }
                    None => changes.push(SemanticChange::Removed {
                        path: child,
                        value: old_value.clone(),
                    }),
                }
            }

            for (key, new_value) in new_obj {
                if !old_obj.contains_key(key) {
                    changes.push(SemanticChange::Added {
                        path: child_path(&path, key),
                        value: new_value.clone(),
                    });
                }
            }
        }
        (Value::Null, _) if path.is_empty() => {
            if let Value::Object(new_obj) = new {
                for (key, value) in new_obj {
                    changes.push(SemanticChange::Added {
                        path: key.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        _ => changes.push(SemanticChange::Modified {
            path,
            old: old.clone(),
            new: new.clone(),
        }),
    }
}

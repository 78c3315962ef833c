//! Non-fatal problems found during a run

use std::fmt;

use tokensync_model::{GroupId, VariableKind};

/// A problem absorbed locally; the run carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Alias target never found; a literal string was written instead
    UnresolvedAlias {
        group: String,
        key: String,
        target: String,
    },
    /// Alias is part of a reference cycle; a literal string was written
    AliasCycle {
        group: String,
        key: String,
        target: String,
    },
    /// Color value not understood; opaque black was written instead
    UnsupportedColorFormat {
        group: String,
        key: String,
        value: String,
    },
    /// Token type with no variable mapping; the token was skipped
    UnsupportedTokenType {
        group: String,
        key: String,
        token_type: String,
    },
    /// Token value unusable for its type; the token was skipped
    UnsupportedTokenValue {
        group: String,
        key: String,
        token_type: String,
        value: String,
    },
    /// Several store groups share a name; only the first is used
    ConflictingIdentity {
        name: String,
        kept: GroupId,
        ignored: Vec<GroupId>,
    },
    /// Group has more than one mode; only the first is used
    MultipleModes { group: String, modes: usize },
    /// Existing variable had a different kind and was recreated
    VariableReplaced {
        group: String,
        key: String,
        previous: VariableKind,
        kind: VariableKind,
    },
    /// Existing variable has a different kind and is still aliased
    /// elsewhere; the token was skipped
    KindMismatch {
        group: String,
        key: String,
        existing: VariableKind,
        requested: VariableKind,
    },
    /// Two leaves flatten to the same key; the one visited last wins
    DuplicateFlatKey { group: String, key: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedAlias { group, key, target } => write!(
                f,
                "{group}: alias '{key}' -> '{{{target}}}' could not be resolved, stored as text"
            ),
            Diagnostic::AliasCycle { group, key, target } => write!(
                f,
                "{group}: alias '{key}' -> '{{{target}}}' is part of a reference cycle, stored as text"
            ),
            Diagnostic::UnsupportedColorFormat { group, key, value } => write!(
                f,
                "{group}: unsupported color '{value}' for '{key}', using black"
            ),
            Diagnostic::UnsupportedTokenType {
                group,
                key,
                token_type,
            } => write!(f, "{group}: unhandled type '{token_type}' for '{key}', skipped"),
            Diagnostic::UnsupportedTokenValue {
                group,
                key,
                token_type,
                value,
            } => write!(
                f,
                "{group}: value {value} is not a valid {token_type} for '{key}', skipped"
            ),
            Diagnostic::ConflictingIdentity {
                name,
                kept,
                ignored,
            } => write!(
                f,
                "{} groups are named \"{name}\"; using {kept}, ignoring {}",
                ignored.len() + 1,
                ignored
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Diagnostic::MultipleModes { group, modes } => write!(
                f,
                "Collection \"{group}\" has {modes} modes. Design tokens do not support modes; \
                 only the first mode is used. Split the modes into separate collections instead."
            ),
            Diagnostic::VariableReplaced {
                group,
                key,
                previous,
                kind,
            } => write!(
                f,
                "{group}: '{key}' changed from {previous} to {kind}, variable recreated"
            ),
            Diagnostic::KindMismatch {
                group,
                key,
                existing,
                requested,
            } => write!(
                f,
                "{group}: '{key}' already exists as {existing} and is referenced by other \
                 variables, cannot store {requested}, skipped"
            ),
            Diagnostic::DuplicateFlatKey { group, key } => {
                write!(f, "{group}: '{key}' is defined more than once, last one wins")
            }
        }
    }
}

/// Collects diagnostics and logs each one as it arrives
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

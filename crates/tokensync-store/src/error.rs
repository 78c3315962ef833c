//! Error types for tokensync-store

use std::path::PathBuf;

use tokensync_model::{GroupId, ModeId, VariableId, VariableKind};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by variable stores and document remotes
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Group not found: {id}")]
    GroupNotFound { id: GroupId },

    #[error("Variable not found: {id}")]
    VariableNotFound { id: VariableId },

    #[error("Mode {mode} does not belong to group {group}")]
    ModeNotFound { group: GroupId, mode: ModeId },

    #[error("Variable '{name}' already exists in group {group}")]
    DuplicateVariable { group: GroupId, name: String },

    /// A value does not match the kind the variable was created with
    #[error("Variable {variable} is {expected}, cannot hold a {found} value")]
    KindMismatch {
        variable: VariableId,
        expected: VariableKind,
        found: VariableKind,
    },

    #[error("Variable {variable} is aliased by {referenced_by}")]
    VariableInUse {
        variable: VariableId,
        referenced_by: VariableId,
    },

    #[error("Variable {variable} cannot alias itself")]
    SelfAlias { variable: VariableId },

    /// Remote payload carried an encoding other than base64
    #[error("Unexpected content encoding '{encoding}' for {path}")]
    UnexpectedEncoding { path: String, encoding: String },

    #[error("Invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Branch not found: {name}")]
    BranchNotFound { name: String },

    #[error("Branch already exists: {name}")]
    BranchExists { name: String },

    #[error("Revision not found: {sha}")]
    RevisionNotFound { sha: String },

    /// Optimistic concurrency check failed on write
    #[error("Conflict writing {path}: expected revision {expected:?}, remote has {actual:?}")]
    Conflict {
        path: String,
        expected: Option<String>,
        actual: Option<String>,
    },

    #[error("A pull request from {head} into {base} already exists")]
    PullRequestExists { head: String, base: String },

    #[error("Pull request not found: #{number}")]
    PullRequestNotFound { number: u64 },

    /// Raw transport failure from a remote implementation
    #[error("Remote request failed: {0}")]
    Transport(String),

    #[error("Failed to access store snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a stale-revision or branch-creation race
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. } | Error::BranchExists { .. })
    }
}

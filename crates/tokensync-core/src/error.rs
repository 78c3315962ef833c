//! Error types for tokensync-core

/// Result type for tokensync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a synchronization run.
///
/// Problems confined to a single token are not errors; they are reported as
/// [`Diagnostic`](crate::Diagnostic)s and the run continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token document could not be decoded
    #[error("Failed to decode token document: {0}")]
    Decode(#[from] tokensync_model::Error),

    /// The remote payload is not UTF-8 text
    #[error("Token document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// No token document at the configured path
    #[error("Token document not found at {path} on {reference}")]
    DocumentNotFound { path: String, reference: String },

    /// The branch new work is based on does not exist
    #[error("Base branch not found: {branch}")]
    BaseBranchMissing { branch: String },

    /// A group exposes no mode to read or write
    #[error("Group '{group}' has no modes")]
    GroupWithoutMode { group: String },

    /// A group was addressed before it was opened for this run
    #[error("Group '{group}' is not part of this run")]
    UnknownGroup { group: String },

    /// Variable store or document remote failure
    #[error(transparent)]
    Store(#[from] tokensync_store::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the remote rejected a write because of a stale revision or a
    /// branch creation race
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Store(e) if e.is_conflict())
    }
}

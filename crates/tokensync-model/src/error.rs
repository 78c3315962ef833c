//! Error types for tokensync-model

/// Result type for tokensync-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a token document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document is structurally not a token document
    #[error("Malformed token document: {message}")]
    Decode { message: String },

    /// The document is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

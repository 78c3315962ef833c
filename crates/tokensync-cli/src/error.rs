//! Error types for tokensync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from tokensync-core
    #[error(transparent)]
    Core(#[from] tokensync_core::Error),

    /// Error from tokensync-store
    #[error(transparent)]
    Store(#[from] tokensync_store::Error),

    /// Token document could not be decoded
    #[error("Invalid token document: {0}")]
    Document(#[from] tokensync_model::Error),

    /// Config file could not be parsed
    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

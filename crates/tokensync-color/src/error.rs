//! Error types for tokensync-color

/// Result type for color codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a color
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unsupported color format: {input}")]
    UnsupportedFormat { input: String },

    #[error("Invalid {channel} channel in color {input}")]
    InvalidChannel { input: String, channel: &'static str },
}

impl Error {
    pub fn unsupported(input: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            input: input.into(),
        }
    }
}

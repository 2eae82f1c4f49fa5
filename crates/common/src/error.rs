//! Error types shared across Recreplay crates.
//!
//! Recording and playback themselves never fail; these errors only surface
//! at I/O and serialization boundaries.

/// Top-level error type for Recreplay operations.
#[derive(Debug, thiserror::Error)]
pub enum RecreplayError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Recording error: {message}")]
    Recording { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using RecreplayError.
pub type RecreplayResult<T> = Result<T, RecreplayError>;

impl RecreplayError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn recording(msg: impl Into<String>) -> Self {
        Self::Recording {
            message: msg.into(),
        }
    }
}

//! Error types shared across Photobooth crates.

use std::path::PathBuf;

/// Top-level error type for Photobooth operations.
#[derive(Debug, thiserror::Error)]
pub enum BoothError {
    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Failed to decode frame for shot {shot}: {message}")]
    Decode { shot: u8, message: String },

    #[error("Failed to encode photostrip: {message}")]
    Encode { message: String },

    #[error("Compose error: {message}")]
    Compose { message: String },

    #[error("Source error: {message}")]
    Source { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using BoothError.
pub type BoothResult<T> = Result<T, BoothError>;

impl BoothError {
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn decode(shot: u8, msg: impl Into<String>) -> Self {
        Self::Decode {
            shot,
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn compose(msg: impl Into<String>) -> Self {
        Self::Compose {
            message: msg.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error aborted a compose call (decode or encode stage).
    pub fn is_compose_failure(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::Encode { .. } | Self::Compose { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_names_shot() {
        let err = BoothError::decode(2, "truncated JPEG");
        assert_eq!(
            err.to_string(),
            "Failed to decode frame for shot 2: truncated JPEG"
        );
        assert!(err.is_compose_failure());
    }

    #[test]
    fn test_session_error_is_not_compose_failure() {
        assert!(!BoothError::session("already capturing").is_compose_failure());
    }
}

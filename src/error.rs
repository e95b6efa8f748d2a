//! Player error types.

use std::path::PathBuf;

/// Errors that can occur while loading recordings or driving the player.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Unsupported recording version: {0}")]
    UnsupportedVersion(u64),

    #[error("Failed to parse recording JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid recording: {0}")]
    InvalidRecording(String),

    #[error("Failed to read recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load recording: {0}")]
    Load(String),

    #[error("Recording is not loaded yet")]
    NotLoaded,

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid option {name}: {reason}")]
    InvalidOption { name: String, reason: String },
}

/// Result alias for player operations.
pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_version_message() {
        let err = PlayerError::UnsupportedVersion(7);
        assert_eq!(err.to_string(), "Unsupported recording version: 7");
    }

    #[test]
    fn invalid_option_message() {
        let err = PlayerError::InvalidOption {
            name: "speed".to_string(),
            reason: "must be positive".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid option speed: must be positive");
    }

    #[test]
    fn parse_error_converts_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PlayerError = serde_err.into();
        assert!(matches!(err, PlayerError::Parse(_)));
    }
}

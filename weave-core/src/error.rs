use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created - edit it and restart.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Lyrics resource errors (absorbed by the loader, never fatal)
    #[error("Lyrics resource {location} unavailable: {reason}")]
    ResourceUnavailable { location: String, reason: String },

    #[error("Lyrics resource {location} contained no usable lines")]
    EmptyParse { location: String },

    #[error("Cannot auto-time lyrics without a usable duration (got {duration})")]
    InvalidDuration { duration: f64 },

    #[error("Invalid lyric sequence: {reason}")]
    InvalidSequence { reason: String },

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CoreError {
    /// Shorthand for a resource that could not be retrieved
    #[must_use]
    pub fn unavailable(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Whether the loader should move on to the next candidate after this error
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ResourceUnavailable { .. } | Self::EmptyParse { .. } | Self::InvalidDuration { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message_names_location() {
        let err = CoreError::unavailable("assets/lyrics/nina.lrc", "status 404");
        assert_eq!(
            err.to_string(),
            "Lyrics resource assets/lyrics/nina.lrc unavailable: status 404"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_config_errors_are_not_recoverable() {
        let err = CoreError::ConfigInvalid {
            message: "bad".to_string(),
        };
        assert!(!err.is_recoverable());
    }
}

use thiserror::Error;
use weave_core::CoreError;
use weave_lyrics_http::HttpSourceError;

/// Errors that end a `weave` invocation
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    HttpSource(#[from] HttpSourceError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, CliError>;

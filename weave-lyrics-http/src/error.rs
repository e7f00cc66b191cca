use thiserror::Error;

/// Errors raised while setting up an HTTP lyric source.
///
/// Failures of individual fetches are reported as
/// [`CoreError::ResourceUnavailable`](weave_core::CoreError::ResourceUnavailable)
/// instead, since a missing lyric file is not a fault.
#[derive(Debug, Error)]
pub enum HttpSourceError {
    /// The configured base URL could not be parsed.
    #[error("Invalid lyrics base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Convenience type alias for Results with `HttpSourceError`.
pub type Result<T> = std::result::Result<T, HttpSourceError>;

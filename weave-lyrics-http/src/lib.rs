pub mod error;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CACHE_CONTROL};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use weave_core::{CoreError, LyricsSource};

pub use error::{HttpSourceError, Result};

const LOG_TARGET: &str = "weave::provider::http";

/// Default timeout for HTTP requests (10 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetches lyric files from a web server.
///
/// Relative locations such as `assets/lyrics/nina.lrc` are resolved against
/// the base URL; absolute URLs are used as-is. Responses are never served
/// from cache so edited lyric files show up on the next track load.
pub struct HttpLyricsSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpLyricsSource {
    /// Create a source with the default 10-second timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be created.
    pub fn new(base: &str) -> Result<Self> {
        Self::with_options(base, Duration::from_secs(DEFAULT_TIMEOUT_SECS), None)
    }

    /// Create a source with an explicit timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be created.
    pub fn with_options(
        base: &str,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5));
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self {
            client: builder.build()?,
            base: parse_base(base)?,
        })
    }

    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve a lyric location to the URL that will be requested
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ResourceUnavailable`] if the location cannot form a URL.
    pub fn resolve(&self, location: &str) -> std::result::Result<Url, CoreError> {
        self.base
            .join(location)
            .map_err(|e| CoreError::unavailable(location, e.to_string()))
    }
}

/// Parse the base URL, making sure it acts as a directory when joined
fn parse_base(base: &str) -> Result<Url> {
    let mut normalized = base.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    Url::parse(&normalized).map_err(|source| HttpSourceError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })
}

#[async_trait]
impl LyricsSource for HttpLyricsSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_text(&self, location: &str) -> weave_core::error::Result<String> {
        let url = self.resolve(location)?;
        debug!(target: LOG_TARGET, "Lyrics request URL: {}", url);

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send()
            .await
            .map_err(|e| CoreError::unavailable(location, e.to_string()))?;

        if !response.status().is_success() {
            debug!(
                target: LOG_TARGET,
                "Lyrics server returned status {} for {}",
                response.status(),
                location
            );
            return Err(CoreError::unavailable(
                location,
                format!("server returned status {}", response.status()),
            ));
        }

        response.text().await.map_err(|e| {
            warn!(target: LOG_TARGET, "Failed to read lyrics body for {}: {}", location, e);
            CoreError::unavailable(location, e.to_string())
        })
    }
}

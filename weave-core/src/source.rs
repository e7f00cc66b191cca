//! Where lyric resources come from.

use crate::error::Result;
use async_trait::async_trait;

/// A place lyric files can be fetched from (an asset directory, a web server).
///
/// Implementations report every failure, including "not found" and non-success
/// responses, as [`CoreError::ResourceUnavailable`](crate::CoreError::ResourceUnavailable).
/// Lyric files are user-supplied and commonly missing, so callers treat that
/// as an absent resource rather than a fault.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Get the source name, used in logs
    fn name(&self) -> &'static str;

    /// Fetch the raw text stored at `location`
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be retrieved.
    async fn fetch_text(&self, location: &str) -> Result<String>;
}

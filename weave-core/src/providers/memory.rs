use crate::error::{CoreError, Result};
use crate::source::LyricsSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Lyric files held in memory, keyed by location.
///
/// Useful for bundled lyrics and for exercising the loader without I/O. An
/// optional per-location delay simulates slow fetches.
#[derive(Debug, Clone, Default)]
pub struct MemoryLyricsSource {
    files: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl MemoryLyricsSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `content` at `location`
    #[must_use]
    pub fn with_file(mut self, location: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(location.into(), content.into());
        self
    }

    /// Delay every fetch of `location` by `delay`
    #[must_use]
    pub fn with_delay(mut self, location: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(location.into(), delay);
        self
    }
}

#[async_trait]
impl LyricsSource for MemoryLyricsSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_text(&self, location: &str) -> Result<String> {
        if let Some(delay) = self.delays.get(location) {
            tokio::time::sleep(*delay).await;
        }

        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| CoreError::unavailable(location, "not found"))
    }
}

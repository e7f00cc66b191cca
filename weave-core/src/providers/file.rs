use crate::error::{CoreError, Result};
use crate::source::LyricsSource;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const LOG_TARGET: &str = "weave::provider::file";

/// Reads lyric files from a local asset directory.
///
/// Locations are relative paths such as `assets/lyrics/nina.lrc`, resolved
/// against the base directory. Absolute paths and `..` are refused so a
/// catalog entry cannot reach outside the asset tree.
pub struct FileLyricsSource {
    base_dir: PathBuf,
}

impl FileLyricsSource {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, location: &str) -> Result<PathBuf> {
        let relative = Path::new(location);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(CoreError::unavailable(
                location,
                "path must stay inside the asset directory",
            ));
        }

        Ok(self.base_dir.join(relative))
    }
}

#[async_trait]
impl LyricsSource for FileLyricsSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch_text(&self, location: &str) -> Result<String> {
        let path = self.resolve(location)?;
        debug!(target: LOG_TARGET, "Reading lyrics from {}", path.display());

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CoreError::unavailable(location, e.to_string()))
    }
}

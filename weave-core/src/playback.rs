//! Track metadata and transport notifications fed into the engine.

use serde::{Deserialize, Serialize};

/// Lyric resources a track may point at.
///
/// Either location may be missing; a missing one is treated the same as a
/// resource that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackLyrics {
    /// Time-tagged (LRC style) resource
    #[serde(default)]
    pub timed: Option<String>,
    /// Plain text resource
    #[serde(default)]
    pub plain: Option<String>,
}

impl TrackLyrics {
    #[must_use]
    pub fn new(timed: Option<String>, plain: Option<String>) -> Self {
        Self {
            timed: timed.filter(|s| !s.trim().is_empty()),
            plain: plain.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Information about the track loaded into the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Catalog identifier
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub lyrics: TrackLyrics,
}

impl TrackInfo {
    /// Create a new track info
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            lyrics: TrackLyrics::default(),
        }
    }

    /// Set the lyric resource locations
    #[must_use]
    pub fn with_lyrics(mut self, timed: Option<&str>, plain: Option<&str>) -> Self {
        self.lyrics = TrackLyrics::new(timed.map(String::from), plain.map(String::from));
        self
    }
}

/// Notifications from the media transport for the current track.
///
/// Times are in seconds. The transport reports `f64::NAN` for a duration it
/// does not know yet.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Regular clock update while playing
    TimeUpdate(f64),
    /// Media metadata is available, including the duration
    LoadedMetadata { duration: f64 },
    /// The clock jumped
    Seeked(f64),
    /// Playback reached the end of the track
    Ended,
    /// The transport failed to load or play the media
    Error(String),
}

//! Picks the lyrics to show for a track from its candidate resources.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auto_time::AutoTimer;
use crate::error::{CoreError, Result};
use crate::lrc::{parse_plain, parse_timed};
use crate::lyrics::{LyricSequence, LyricsMode};
use crate::playback::TrackLyrics;
use crate::source::LyricsSource;

const LOG_TARGET: &str = "weave::loader";

/// Shown in place of a location the track does not define
const MISSING_LOCATION: &str = "(none)";

/// Format a candidate resource is expected to be in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Time-tagged; falls back to plain text when it carries no valid tags
    Timed,
    Plain,
}

/// One `(fetch, parse)` attempt in the loader's priority list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateStep {
    pub kind: ResourceKind,
    pub location: Option<String>,
}

impl CandidateStep {
    fn location_label(&self) -> &str {
        self.location.as_deref().unwrap_or(MISSING_LOCATION)
    }
}

/// Progress through the candidate list
#[derive(Debug)]
enum LoadState {
    Trying(usize),
    Settled(LyricSequence),
}

/// Outcome of a load: the lyrics to install, plus a hint when there are none.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLyrics {
    pub sequence: LyricSequence,
    pub message: Option<String>,
}

impl LoadedLyrics {
    #[must_use]
    pub const fn mode(&self) -> LyricsMode {
        self.sequence.mode()
    }
}

/// Fetches and parses lyric resources, degrading to "no lyrics" on failure.
pub struct LyricsLoader {
    source: Arc<dyn LyricsSource>,
    auto_timer: AutoTimer,
}

impl LyricsLoader {
    #[must_use]
    pub fn new(source: Arc<dyn LyricsSource>, auto_timer: AutoTimer) -> Self {
        Self { source, auto_timer }
    }

    /// Candidate resources in priority order: timed first, then plain
    #[must_use]
    pub fn candidates(lyrics: &TrackLyrics) -> Vec<CandidateStep> {
        vec![
            CandidateStep {
                kind: ResourceKind::Timed,
                location: lyrics.timed.clone(),
            },
            CandidateStep {
                kind: ResourceKind::Plain,
                location: lyrics.plain.clone(),
            },
        ]
    }

    /// Load lyrics for a track.
    ///
    /// Never fails: unavailable or empty resources move on to the next
    /// candidate, and when none succeeds the result is `LyricsMode::None` with
    /// a message naming the locations that were tried. Plain lyrics are
    /// auto-timed right away if `duration` is already usable.
    pub async fn load(&self, lyrics: &TrackLyrics, duration: Option<f64>) -> LoadedLyrics {
        let steps = Self::candidates(lyrics);
        let mut state = LoadState::Trying(0);

        let sequence = loop {
            state = match state {
                LoadState::Trying(index) => match steps.get(index) {
                    Some(step) => match self.try_candidate(step).await {
                        Ok(sequence) => {
                            info!(
                                target: LOG_TARGET,
                                "Loaded {} lyrics from {} ({} lines, source: {})",
                                sequence.mode(),
                                step.location_label(),
                                sequence.len(),
                                self.source.name()
                            );
                            LoadState::Settled(sequence)
                        }
                        Err(e) => {
                            if e.is_recoverable() {
                                debug!(target: LOG_TARGET, "Candidate {} skipped: {}", index, e);
                            } else {
                                warn!(target: LOG_TARGET, "Candidate {} failed: {}", index, e);
                            }
                            LoadState::Trying(index + 1)
                        }
                    },
                    None => LoadState::Settled(LyricSequence::none()),
                },
                LoadState::Settled(sequence) => break sequence,
            };
        };

        if sequence.mode() == LyricsMode::None {
            info!(
                target: LOG_TARGET,
                "No lyrics found (tried {} candidates)",
                steps.len()
            );
            return LoadedLyrics {
                sequence,
                message: Some(no_lyrics_message(lyrics)),
            };
        }

        let sequence = match duration.and_then(|d| self.auto_timer.promote(&sequence, d)) {
            Some(promoted) => {
                debug!(target: LOG_TARGET, "Auto-timed plain lyrics at load time");
                promoted
            }
            None => sequence,
        };

        LoadedLyrics {
            sequence,
            message: None,
        }
    }

    async fn try_candidate(&self, step: &CandidateStep) -> Result<LyricSequence> {
        let Some(location) = step.location.as_deref() else {
            return Err(CoreError::unavailable(MISSING_LOCATION, "track has no such resource"));
        };

        let text = self.source.fetch_text(location).await?;
        if text.trim().is_empty() {
            return Err(CoreError::EmptyParse {
                location: location.to_string(),
            });
        }

        if step.kind == ResourceKind::Timed {
            let timed = parse_timed(Some(&text));
            if !timed.is_empty() {
                return LyricSequence::timed(timed);
            }
            // A timed file without valid tags is read as plain text
            debug!(
                target: LOG_TARGET,
                "{} has no time tags, reading it as plain text", location
            );
        }

        let plain = parse_plain(Some(&text));
        if plain.is_empty() {
            return Err(CoreError::EmptyParse {
                location: location.to_string(),
            });
        }

        Ok(LyricSequence::plain(plain))
    }
}

/// Hint shown when neither resource produced lyrics
#[must_use]
pub fn no_lyrics_message(lyrics: &TrackLyrics) -> String {
    format!(
        "No lyrics yet. Place a lyric file at:\n{}\nor\n{}",
        lyrics.timed.as_deref().unwrap_or(MISSING_LOCATION),
        lyrics.plain.as_deref().unwrap_or(MISSING_LOCATION)
    )
}

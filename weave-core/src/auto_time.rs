//! Synthetic timing for lyrics that come without timestamps.
//!
//! This is a best-effort approximation: lines are spread evenly across the
//! track, so the highlighted line only roughly follows the vocals.

use crate::lyrics::{LyricLine, LyricSequence, LyricsMode};
use serde::{Deserialize, Serialize};

/// Spacing parameters for auto-timed lyrics, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoTimer {
    /// Time of the first line
    #[serde(default = "default_lead_in")]
    pub lead_in_secs: f64,
    /// Minimum distance between the first and last line
    #[serde(default = "default_min_span")]
    pub min_span_secs: f64,
    /// Buffer kept free before the end of the track
    #[serde(default = "default_tail")]
    pub tail_secs: f64,
}

const fn default_lead_in() -> f64 {
    0.25
}

const fn default_min_span() -> f64 {
    0.25
}

const fn default_tail() -> f64 {
    0.75
}

impl Default for AutoTimer {
    fn default() -> Self {
        Self {
            lead_in_secs: default_lead_in(),
            min_span_secs: default_min_span(),
            tail_secs: default_tail(),
        }
    }
}

impl AutoTimer {
    /// Spread `lines` evenly over a track of `duration` seconds.
    ///
    /// Returns an empty list when there are no lines or the duration is not
    /// a finite positive number.
    #[must_use]
    pub fn apply(&self, lines: &[LyricLine], duration: f64) -> Vec<LyricLine> {
        if lines.is_empty() || !is_usable_duration(duration) {
            return Vec::new();
        }

        let start = self.lead_in_secs;
        let end = (start + self.min_span_secs).max(duration - self.tail_secs);
        let step = match lines.len() {
            1 => 0.0,
            n => (end - start) / index_as_f64(n - 1),
        };

        lines
            .iter()
            .enumerate()
            .map(|(i, line)| LyricLine::timed(line.text.clone(), start + step * index_as_f64(i)))
            .collect()
    }

    /// Auto-time a plain sequence.
    ///
    /// Returns `None` when `sequence` is not plain or `duration` is unusable,
    /// in which case the caller keeps what it has and retries later.
    #[must_use]
    pub fn promote(&self, sequence: &LyricSequence, duration: f64) -> Option<LyricSequence> {
        if sequence.mode() != LyricsMode::Plain {
            return None;
        }

        let timed = self.apply(sequence.lines(), duration);
        if timed.is_empty() {
            return None;
        }

        // Evenly spaced from a non-negative start, so always sorted
        LyricSequence::auto_timed(timed).ok()
    }
}

/// Lyric files hold at most a few hundred lines, far below `u32::MAX`
fn index_as_f64(i: usize) -> f64 {
    f64::from(u32::try_from(i).unwrap_or(u32::MAX))
}

/// Spread `lines` over `duration` seconds with the default spacing.
#[must_use]
pub fn auto_time(lines: &[LyricLine], duration: f64) -> Vec<LyricLine> {
    AutoTimer::default().apply(lines, duration)
}

/// Whether `duration` can drive auto-timing
#[must_use]
pub fn is_usable_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

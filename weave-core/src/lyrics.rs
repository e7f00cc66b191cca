//! Lyric lines and the sequences they are grouped into.

use crate::error::{CoreError, Result};
use serde::Serialize;
use std::sync::Arc;

/// A single display line, optionally anchored at a time in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LyricLine {
    pub text: String,
    /// Start time in seconds; `None` for untimed lines
    pub time: Option<f64>,
}

impl LyricLine {
    /// Create an untimed line
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            time: None,
        }
    }

    /// Create a line anchored at `time` seconds
    #[must_use]
    pub fn timed(text: impl Into<String>, time: f64) -> Self {
        Self {
            text: text.into(),
            time: Some(time),
        }
    }

    #[must_use]
    pub const fn is_timed(&self) -> bool {
        self.time.is_some()
    }
}

/// How the lines of a sequence are timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LyricsMode {
    /// No lyrics available for the track
    #[default]
    None,
    /// Lines without timing
    Plain,
    /// Lines timed by the lyric file itself
    Timed,
    /// Plain lines spread evenly over the track duration
    AutoTimed,
}

impl LyricsMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Plain => "plain",
            Self::Timed => "timed",
            Self::AutoTimed => "auto_timed",
        }
    }

    /// Whether lines in this mode carry times the tracker can follow
    #[must_use]
    pub const fn is_synced(self) -> bool {
        matches!(self, Self::Timed | Self::AutoTimed)
    }
}

impl std::fmt::Display for LyricsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered lines plus their mode.
///
/// The constructors uphold the invariants: synced modes hold only timed lines
/// sorted by time, `Plain` holds only untimed lines and `None` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricSequence {
    mode: LyricsMode,
    lines: Arc<[LyricLine]>,
}

impl LyricSequence {
    /// The "no lyrics available" sequence
    #[must_use]
    pub fn none() -> Self {
        Self {
            mode: LyricsMode::None,
            lines: Arc::from(Vec::new()),
        }
    }

    /// Build a plain sequence, dropping any timing the lines carry
    #[must_use]
    pub fn plain(lines: Vec<LyricLine>) -> Self {
        let lines: Vec<_> = lines
            .into_iter()
            .map(|line| LyricLine::plain(line.text))
            .collect();
        Self {
            mode: LyricsMode::Plain,
            lines: lines.into(),
        }
    }

    /// Build a sequence timed by its source
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSequence`] if a line has no time or the
    /// lines are not sorted by time.
    pub fn timed(lines: Vec<LyricLine>) -> Result<Self> {
        Self::synced(LyricsMode::Timed, lines)
    }

    /// Build a sequence whose times were synthesized from the track duration
    ///
    /// # Errors
    ///
    /// Same conditions as [`LyricSequence::timed`].
    pub fn auto_timed(lines: Vec<LyricLine>) -> Result<Self> {
        Self::synced(LyricsMode::AutoTimed, lines)
    }

    fn synced(mode: LyricsMode, lines: Vec<LyricLine>) -> Result<Self> {
        let mut previous = f64::NEG_INFINITY;
        for (index, line) in lines.iter().enumerate() {
            let Some(time) = line.time else {
                return Err(CoreError::InvalidSequence {
                    reason: format!("line {index} has no time"),
                });
            };
            if time.is_nan() || time < previous {
                return Err(CoreError::InvalidSequence {
                    reason: format!("line {index} at {time}s is out of order"),
                });
            }
            previous = time;
        }

        Ok(Self {
            mode,
            lines: lines.into(),
        })
    }

    #[must_use]
    pub const fn mode(&self) -> LyricsMode {
        self.mode
    }

    #[must_use]
    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    /// Shared handle to the lines, cheap to hand to renderers
    #[must_use]
    pub fn shared_lines(&self) -> Arc<[LyricLine]> {
        Arc::clone(&self.lines)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the last line whose time has been reached at `clock`.
    ///
    /// Lines sharing a timestamp resolve to the later one. Always `None` for
    /// sequences that are not synced.
    #[must_use]
    pub fn line_index_at(&self, clock: f64) -> Option<usize> {
        if !self.mode.is_synced() {
            return None;
        }

        let reached = self
            .lines
            .partition_point(|line| line.time.is_some_and(|time| time <= clock));
        reached.checked_sub(1)
    }
}

impl Default for LyricSequence {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(times: &[f64]) -> LyricSequence {
        let lines = times
            .iter()
            .enumerate()
            .map(|(i, t)| LyricLine::timed(format!("line {i}"), *t))
            .collect();
        LyricSequence::timed(lines).unwrap()
    }

    #[test]
    fn test_none_is_empty() {
        let none = LyricSequence::none();
        assert_eq!(none.mode(), LyricsMode::None);
        assert!(none.is_empty());
    }

    #[test]
    fn test_plain_strips_times() {
        let plain = LyricSequence::plain(vec![LyricLine::timed("a", 1.0), LyricLine::plain("b")]);
        assert_eq!(plain.mode(), LyricsMode::Plain);
        assert!(plain.lines().iter().all(|l| !l.is_timed()));
    }

    #[test]
    fn test_timed_rejects_untimed_line() {
        let result = LyricSequence::timed(vec![LyricLine::timed("a", 1.0), LyricLine::plain("b")]);
        assert!(matches!(result, Err(CoreError::InvalidSequence { .. })));
    }

    #[test]
    fn test_timed_rejects_unsorted() {
        let result =
            LyricSequence::timed(vec![LyricLine::timed("a", 2.0), LyricLine::timed("b", 1.0)]);
        assert!(matches!(result, Err(CoreError::InvalidSequence { .. })));
    }

    #[test]
    fn test_timed_rejects_nan() {
        let result = LyricSequence::timed(vec![LyricLine::timed("a", f64::NAN)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_line_index_ties_resolve_to_last() {
        let seq = sequence(&[0.0, 5.0, 5.0, 10.0]);
        assert_eq!(seq.line_index_at(5.0), Some(2));
        assert_eq!(seq.line_index_at(4.9), Some(0));
        assert_eq!(seq.line_index_at(-1.0), None);
        assert_eq!(seq.line_index_at(100.0), Some(3));
    }

    #[test]
    fn test_line_index_plain_is_none() {
        let plain = LyricSequence::plain(vec![LyricLine::plain("a")]);
        assert_eq!(plain.line_index_at(10.0), None);
    }

    #[test]
    fn test_mode_as_str() {
        assert_eq!(LyricsMode::AutoTimed.as_str(), "auto_timed");
        assert!(LyricsMode::Timed.is_synced());
        assert!(!LyricsMode::Plain.is_synced());
    }
}

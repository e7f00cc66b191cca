//! Per-track lyric state and active-line tracking.

use crate::auto_time::AutoTimer;
use crate::lyrics::{LyricSequence, LyricsMode};
use crate::view::LyricsView;
use tracing::debug;

const LOG_TARGET: &str = "weave::tracker";

/// Result of feeding one clock value to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the active line moved; the only reason to re-render
    pub changed: bool,
    pub active_index: Option<usize>,
}

/// Lyrics loaded for one track session, tagged with the session generation.
///
/// A new value is built for every track; nothing carries over.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    generation: u64,
    sequence: LyricSequence,
    active_index: Option<usize>,
    /// Hint shown when there are no lines to display
    message: Option<String>,
}

impl SyncState {
    #[must_use]
    pub const fn new(generation: u64, sequence: LyricSequence, message: Option<String>) -> Self {
        Self {
            generation,
            sequence,
            active_index: None,
            message,
        }
    }

    /// Placeholder state while lyrics for `generation` are being fetched
    #[must_use]
    pub fn loading(generation: u64, message: impl Into<String>) -> Self {
        Self::new(generation, LyricSequence::none(), Some(message.into()))
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn sequence(&self) -> &LyricSequence {
        &self.sequence
    }

    #[must_use]
    pub const fn mode(&self) -> LyricsMode {
        self.sequence.mode()
    }

    /// Active line, `None` before the first line or when lyrics are untimed
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Move the active line to match `clock`.
    ///
    /// Recomputes from scratch on every call, so seeks in either direction
    /// need no special handling. Untimed sequences are left untouched.
    pub fn on_clock_tick(&mut self, clock: f64) -> TickOutcome {
        if !self.mode().is_synced() {
            return TickOutcome {
                changed: false,
                active_index: self.active_index,
            };
        }

        let index = self.sequence.line_index_at(clock);
        let changed = index != self.active_index;
        if changed {
            self.active_index = index;
        }

        TickOutcome {
            changed,
            active_index: index,
        }
    }

    /// Turn plain lyrics into auto-timed ones once the duration is known.
    ///
    /// Returns `None` if nothing changed: the lyrics are not plain, or the
    /// duration is unusable. Otherwise the active line is reset and re-derived
    /// from `clock` so the display catches up without waiting for a tick.
    pub fn promote(&mut self, timer: &AutoTimer, duration: f64, clock: f64) -> Option<TickOutcome> {
        let sequence = timer.promote(&self.sequence, duration)?;

        debug!(
            target: LOG_TARGET,
            "Auto-timed {} lines over {:.2}s (generation {})",
            sequence.len(),
            duration,
            self.generation
        );

        self.sequence = sequence;
        self.active_index = None;
        Some(self.on_clock_tick(clock))
    }

    /// Snapshot for the renderer
    #[must_use]
    pub fn view(&self) -> LyricsView {
        if self.sequence.mode() == LyricsMode::None {
            return LyricsView::Empty {
                message: self.message.clone().unwrap_or_default(),
            };
        }

        LyricsView::Lines {
            lines: self.sequence.shared_lines(),
            active_index: self.active_index,
            mode: self.sequence.mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::LyricLine;

    fn timed_state(times: &[f64]) -> SyncState {
        let lines = times
            .iter()
            .map(|t| LyricLine::timed(format!("at {t}"), *t))
            .collect();
        SyncState::new(1, LyricSequence::timed(lines).unwrap(), None)
    }

    fn plain_state(n: usize) -> SyncState {
        let lines = (0..n).map(|i| LyricLine::plain(format!("L{i}"))).collect();
        SyncState::new(1, LyricSequence::plain(lines), None)
    }

    #[test]
    fn test_tick_tie_breaking() {
        let mut state = timed_state(&[0.0, 5.0, 5.0, 10.0]);

        let outcome = state.on_clock_tick(5.0);
        assert_eq!(outcome.active_index, Some(2));
        assert!(outcome.changed);

        assert_eq!(state.on_clock_tick(4.9).active_index, Some(0));
        assert_eq!(state.on_clock_tick(-1.0).active_index, None);
        assert_eq!(state.active_index(), None);
    }

    #[test]
    fn test_tick_is_idempotent() {
        let mut state = timed_state(&[0.0, 5.0, 10.0]);
        assert!(state.on_clock_tick(6.0).changed);
        assert!(!state.on_clock_tick(6.0).changed);
        // Still inside the same line
        assert!(!state.on_clock_tick(9.0).changed);
    }

    #[test]
    fn test_tick_before_first_line_is_unchanged() {
        let mut state = timed_state(&[1.0, 2.0]);
        let outcome = state.on_clock_tick(0.5);
        assert!(!outcome.changed);
        assert_eq!(outcome.active_index, None);
    }

    #[test]
    fn test_tick_handles_seek_backwards() {
        let mut state = timed_state(&[0.0, 5.0, 10.0]);
        state.on_clock_tick(12.0);
        let outcome = state.on_clock_tick(1.0);
        assert!(outcome.changed);
        assert_eq!(outcome.active_index, Some(0));
    }

    #[test]
    fn test_tick_noop_for_plain() {
        let mut state = plain_state(3);
        let outcome = state.on_clock_tick(100.0);
        assert!(!outcome.changed);
        assert_eq!(outcome.active_index, None);
    }

    #[test]
    fn test_promote_plain_catches_up_to_clock() {
        let mut state = plain_state(3);
        let outcome = state.promote(&AutoTimer::default(), 10.0, 5.0).unwrap();
        assert_eq!(state.mode(), LyricsMode::AutoTimed);
        assert_eq!(outcome.active_index, Some(1));
        assert!(outcome.changed);
    }

    #[test]
    fn test_promote_requires_duration() {
        let mut state = plain_state(3);
        assert!(state.promote(&AutoTimer::default(), f64::NAN, 0.0).is_none());
        assert_eq!(state.mode(), LyricsMode::Plain);
    }

    #[test]
    fn test_promote_only_once() {
        let mut state = plain_state(2);
        assert!(state.promote(&AutoTimer::default(), 10.0, 0.0).is_some());
        assert!(state.promote(&AutoTimer::default(), 20.0, 0.0).is_none());
    }

    #[test]
    fn test_promote_ignores_timed() {
        let mut state = timed_state(&[1.0]);
        assert!(state.promote(&AutoTimer::default(), 10.0, 0.0).is_none());
        assert_eq!(state.mode(), LyricsMode::Timed);
    }

    #[test]
    fn test_view_for_none_uses_message() {
        let state = SyncState::loading(3, "Loading lyrics for: Nina…");
        assert_eq!(
            state.view(),
            LyricsView::Empty {
                message: "Loading lyrics for: Nina…".to_string()
            }
        );
    }

    #[test]
    fn test_view_for_plain_lists_lines() {
        let state = plain_state(2);
        match state.view() {
            LyricsView::Lines {
                lines,
                active_index,
                mode,
            } => {
                assert_eq!(lines.len(), 2);
                assert_eq!(active_index, None);
                assert_eq!(mode, LyricsMode::Plain);
            }
            LyricsView::Empty { .. } => panic!("expected lines"),
        }
    }
}

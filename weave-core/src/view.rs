//! Render snapshots published to lyric displays.

use crate::lyrics::{LyricLine, LyricsMode};
use std::sync::Arc;

/// What a renderer should display for the current track.
///
/// Rendering is a pure function of this value; the engine publishes a new one
/// only when the lines or the active index change.
#[derive(Debug, Clone, PartialEq)]
pub enum LyricsView {
    /// Nothing to show beyond a hint (loading, or no lyrics found)
    Empty { message: String },
    /// Lines to list, with the highlighted one if the clock has reached it
    Lines {
        lines: Arc<[LyricLine]>,
        active_index: Option<usize>,
        mode: LyricsMode,
    },
}

impl LyricsView {
    /// The highlighted line, if any
    #[must_use]
    pub fn active_line(&self) -> Option<&LyricLine> {
        match self {
            Self::Lines {
                lines,
                active_index: Some(index),
                ..
            } => lines.get(*index),
            _ => None,
        }
    }

    /// Lines around the active one, for compact displays.
    ///
    /// Before the first line is reached the window starts at the top.
    #[must_use]
    pub fn visible_window(&self, before: usize, after: usize) -> &[LyricLine] {
        let Self::Lines {
            lines,
            active_index,
            ..
        } = self
        else {
            return &[];
        };

        let current = active_index.unwrap_or(0);
        let start = current.saturating_sub(before);
        let end = current.saturating_add(after).saturating_add(1).min(lines.len());

        lines.get(start..end).unwrap_or_default()
    }
}

//! Text rendering of lyric sequences and views for the terminal.

use serde::Serialize;
use weave_core::{format_clock, LoadedLyrics, LyricLine, LyricsMode, LyricsView};

/// JSON shape printed by `weave show --json`
#[derive(Debug, Serialize)]
struct SequenceOutput<'a> {
    title: &'a str,
    mode: LyricsMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    lines: &'a [LyricLine],
}

fn format_line(line: &LyricLine) -> String {
    match line.time {
        Some(time) => format!("[{}] {}", format_clock(time), line.text),
        None => line.text.clone(),
    }
}

/// Lines printed by `weave show`
pub fn render_loaded(title: &str, loaded: &LoadedLyrics) -> Vec<String> {
    if let Some(message) = loaded.message.as_deref().filter(|_| loaded.sequence.is_empty()) {
        return message.lines().map(String::from).collect();
    }

    let mut out = Vec::with_capacity(loaded.sequence.len() + 1);
    out.push(format!(
        "{title}: {} lines ({})",
        loaded.sequence.len(),
        loaded.mode()
    ));
    out.extend(loaded.sequence.lines().iter().map(format_line));
    out
}

/// JSON document printed by `weave show --json`
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_loaded_json(title: &str, loaded: &LoadedLyrics) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SequenceOutput {
        title,
        mode: loaded.mode(),
        message: loaded.message.as_deref(),
        lines: loaded.sequence.lines(),
    })
}

/// Lines printed by `weave play` when the engine publishes a new view.
///
/// Synced lyrics print the active line with `context` lines around it, the
/// active one marked with `>`. Plain lyrics print once in full since there is
/// nothing to follow.
pub fn render_view(view: &LyricsView, context: usize) -> Vec<String> {
    match view {
        LyricsView::Empty { message } => message.lines().map(String::from).collect(),
        LyricsView::Lines {
            lines,
            mode: LyricsMode::Plain,
            ..
        } => {
            let mut out = vec![format!("Plain lyrics ({} lines, not synced):", lines.len())];
            out.extend(lines.iter().map(|line| format!("  {}", line.text)));
            out
        }
        LyricsView::Lines {
            active_index: Some(active),
            ..
        } => {
            let window = view.visible_window(context, context);
            let active_offset = (*active).min(context);
            let mut out: Vec<String> = window
                .iter()
                .enumerate()
                .map(|(offset, line)| {
                    let marker = if offset == active_offset { '>' } else { ' ' };
                    format!("{marker} {}", format_line(line))
                })
                .collect();
            if context > 0 {
                out.push(String::new());
            }
            out
        }
        LyricsView::Lines { .. } => Vec::new(),
    }
}

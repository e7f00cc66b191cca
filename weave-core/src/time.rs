//! Clock formatting helpers.

/// Format a playback position as `m:ss`.
///
/// Non-finite or negative values render as `0:00`, matching what the player
/// shows before the media duration is known.
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    // Saturating float-to-int cast, and the value is finite and non-negative
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.floor() as u64;
    let minutes = total / 60;
    let secs = total % 60;

    format!("{minutes}:{secs:02}")
}

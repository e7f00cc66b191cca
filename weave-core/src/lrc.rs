//! Parsers for time-tagged (LRC style) and plain-text lyric files.

use crate::lyrics::LyricLine;

/// Parse LRC-style text into timed lines sorted by time.
///
/// Every `[m:ss]` or `[m:ss.xx]` tag on a row produces one line carrying the
/// row's text with all tags removed, so `[00:05][00:15]Chorus` yields two
/// lines. Rows without a valid tag, or whose remaining text is empty, are
/// skipped. Rows sharing a time keep their input order.
#[must_use]
pub fn parse_timed(input: Option<&str>) -> Vec<LyricLine> {
    let Some(input) = input else {
        return Vec::new();
    };

    let mut lines = Vec::new();

    for row in split_rows(input) {
        let (times, text) = extract_time_tags(row);
        if times.is_empty() || text.is_empty() {
            continue;
        }

        for time in times {
            lines.push(LyricLine::timed(text.clone(), time));
        }
    }

    // Vec::sort_by is stable, ties keep input order
    lines.sort_by(|a, b| {
        a.time
            .unwrap_or_default()
            .total_cmp(&b.time.unwrap_or_default())
    });

    lines
}

/// Parse plain text into untimed lines, one per non-blank row.
#[must_use]
pub fn parse_plain(input: Option<&str>) -> Vec<LyricLine> {
    let Some(input) = input else {
        return Vec::new();
    };

    split_rows(input)
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .map(LyricLine::plain)
        .collect()
}

/// Split on `\n`, `\r\n` and bare `\r`, after dropping a leading UTF-8 BOM.
/// The empty piece produced between `\r` and `\n` is harmless since both
/// parsers skip blank rows.
fn split_rows(input: &str) -> impl Iterator<Item = &str> {
    input
        .strip_prefix('\u{feff}')
        .unwrap_or(input)
        .split(['\r', '\n'])
}

/// Pull every time tag out of a row, returning the times and the trimmed text
/// left once the tags are removed.
fn extract_time_tags(row: &str) -> (Vec<f64>, String) {
    let mut times = Vec::new();
    let mut text = String::with_capacity(row.len());
    let mut remaining = row;

    // Only the last `[` before a `]` can open a time tag, since tag contents
    // never contain brackets. Each byte is visited once.
    while let Some(close) = remaining.find(']') {
        let segment = &remaining[..close];

        let tag = segment
            .rfind('[')
            .and_then(|open| parse_timestamp(&segment[open + 1..]).map(|t| (open, t)));

        match tag {
            Some((open, time)) => {
                text.push_str(&segment[..open]);
                times.push(time);
            }
            None => {
                // Not a time tag, keep it as text
                text.push_str(segment);
                text.push(']');
            }
        }

        remaining = &remaining[close + 1..];
    }
    text.push_str(remaining);

    (times, text.trim().to_string())
}

/// Parse the inside of a tag like "01:02.50" into seconds.
///
/// Minutes and seconds must be ASCII digits; seconds may carry a fraction.
/// Anything else (ID tags such as `ti:Title`, signs, exponents) is rejected.
fn parse_timestamp(s: &str) -> Option<f64> {
    let (minutes, seconds) = s.split_once(':')?;

    if !is_digits(minutes) {
        return None;
    }

    let valid_seconds = match seconds.split_once('.') {
        Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
        None => is_digits(seconds),
    };
    if !valid_seconds {
        return None;
    }

    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    let time = minutes * 60.0 + seconds;

    time.is_finite().then_some(time)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

//! Capture timestamp naming.
//!
//! Captures are named by local ISO-8601 time with microseconds, which sorts
//! lexically. Tiles are keyed by the minute prefix `YYYY-MM-DDThh:mm`.

use chrono::NaiveDateTime;

/// Format used for capture filenames.
pub const CAPTURE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Length of a `YYYY-MM-DDThh:mm` key.
const MINUTE_KEY_LEN: usize = 16;

/// Render a capture time the way capture files are named.
pub fn capture_timestamp(time: NaiveDateTime) -> String {
    time.format(CAPTURE_FORMAT).to_string()
}

/// Replace characters that are not allowed in filenames on the target platform.
///
/// Only `:` is affected; it is replaced with `_` when `restricted` is set.
pub fn sanitize_timestamp(timestamp: &str, restricted: bool) -> String {
    if restricted {
        timestamp.replace(':', "_")
    } else {
        timestamp.to_string()
    }
}

/// Find the first `YYYY-MM-DDThh:mm` timestamp inside a filename.
///
/// The hour/minute separator may also be `_` (sanitized names); the returned
/// key always uses `:`.
pub fn minute_key(filename: &str) -> Option<String> {
    let bytes = filename.as_bytes();
    if bytes.len() < MINUTE_KEY_LEN {
        return None;
    }

    bytes
        .windows(MINUTE_KEY_LEN)
        .position(is_minute_key)
        .map(|start| {
            let mut key = filename[start..start + MINUTE_KEY_LEN].to_string();
            key.replace_range(13..14, ":");
            key
        })
}

fn is_minute_key(window: &[u8]) -> bool {
    window.iter().enumerate().all(|(i, &b)| match i {
        4 | 7 => b == b'-',
        10 => b == b'T',
        13 => b == b':' || b == b'_',
        _ => b.is_ascii_digit(),
    })
}

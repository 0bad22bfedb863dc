//! Logging helpers that keep chat text on a single log line.

use std::fmt::Write;

const MAX_PREVIEW: usize = 200;

/// Escape chat text for single-line logging.
///
/// Newlines, carriage returns, tabs and backslashes are written as escapes, other control
/// characters as `\xNN`. Anything past [MAX_PREVIEW] characters is cut with an ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Short form of a chat or player id for log lines (`5511…@g.us` style ids get trimmed
/// to their local part).
pub fn short_id(id: &str) -> &str {
    match id.split_once('@') {
        Some((local, _)) if !local.is_empty() => local,
        _ => id,
    }
}

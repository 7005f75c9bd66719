use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Single-column ellipsis used when a label is cut.
const ELLIPSIS: char = '…';

/// Width of `s` in terminal columns (CJK and emoji count as two).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` so it occupies at most `max_width` columns.
///
/// When the label does not fit, the last visible column becomes `…`.
/// Labels that fit are returned borrowed.
///
/// ```
/// use cinema::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Arena", 10), "Arena");
/// assert_eq!(truncate_to_width("Arena Sports", 6), "Arena…");
/// assert_eq!(truncate_to_width("Arena", 0), "");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(s.len().min(max_width * 4));
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Truncate, then right-pad with spaces to exactly `width` columns.
///
/// Grid cells use this so borders line up regardless of label length.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let cut = truncate_to_width(s, width);
    let fill = width.saturating_sub(display_width(&cut));
    let mut out = String::with_capacity(cut.len() + fill);
    out.push_str(&cut);
    out.extend(std::iter::repeat(' ').take(fill));
    out
}

fn is_control(c: char) -> bool {
    (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r')) || ('\u{80}'..='\u{9f}').contains(&c)
}

#[derive(Clone, Copy)]
enum Escape {
    None,
    /// Just saw ESC
    Start,
    /// Inside `ESC [`, until a final byte 0x40..=0x7e
    Csi,
    /// Inside `ESC ]`, until BEL or `ESC \`
    Osc,
    /// Saw ESC inside an OSC; `\` terminates
    OscEsc,
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Channel names and event descriptions come from a remote catalog and are
/// drawn straight into the terminal. Tab, newline and carriage return are
/// kept; C0/C1 controls, DEL, CSI and OSC sequences are dropped.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut state = Escape::None;

    for c in s.chars() {
        state = match (state, c) {
            (Escape::None, '\x1b') => Escape::Start,
            (Escape::None, c) => {
                if !is_control(c) {
                    out.push(c);
                }
                Escape::None
            }
            (Escape::Start, '[') => Escape::Csi,
            (Escape::Start, ']') => Escape::Osc,
            (Escape::Start, '\x1b') => Escape::Start,
            (Escape::Start, c) => {
                // Bare ESC: drop it, keep what follows
                if !is_control(c) {
                    out.push(c);
                }
                Escape::None
            }
            (Escape::Csi, '\x40'..='\x7e') => Escape::None,
            (Escape::Csi, _) => Escape::Csi,
            (Escape::Osc, '\x07') => Escape::None,
            (Escape::Osc, '\x1b') => Escape::OscEsc,
            (Escape::Osc, _) => Escape::Osc,
            (Escape::OscEsc, '\\') => Escape::None,
            (Escape::OscEsc, _) => Escape::Osc,
        };
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_counts_wide_chars() {
        assert_eq!(display_width("Arena"), 5);
        assert_eq!(display_width("体育"), 4);
    }

    #[test]
    fn test_truncate_fits_is_borrowed() {
        assert!(matches!(truncate_to_width("News 24", 7), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("World Cup Final", 8), "World C…");
        assert_eq!(truncate_to_width("Arena", 1), "…");
    }

    #[test]
    fn test_truncate_wide_chars_never_overflow() {
        let cut = truncate_to_width("体育频道直播", 6);
        assert_eq!(cut, "体育…");
        assert!(display_width(&cut) <= 6);
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("TV", 5), "TV   ");
        assert_eq!(pad_to_width("Channel", 5), "Chan…");
        assert_eq!(display_width(&pad_to_width("体育频道", 5)), 5);
    }

    #[test]
    fn test_strip_clean_is_borrowed() {
        assert!(matches!(strip_control_chars("Sport 1 LIVE"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_keeps_whitespace() {
        assert_eq!(strip_control_chars("a\tb\nc\r"), "a\tb\nc\r");
    }

    #[test]
    fn test_strip_plain_controls() {
        assert_eq!(strip_control_chars("a\x00b\x07c\x7fd"), "abcd");
        assert_eq!(strip_control_chars("x\u{9b}y"), "xy");
    }

    #[test]
    fn test_strip_csi_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("\x1b[2J\x1b[HHome"), "Home");
    }

    #[test]
    fn test_strip_osc_sequences() {
        assert_eq!(strip_control_chars("\x1b]0;title\x07Name"), "Name");
        assert_eq!(strip_control_chars("\x1b]8;;http://x\x1b\\Link"), "Link");
    }

    #[test]
    fn test_strip_bare_esc() {
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(strip_control_chars("Ñandú \x1b[1m体育\x1b[0m"), "Ñandú 体育");
    }
}

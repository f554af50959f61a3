//! Display sanitization for text received from the remote API.
//!
//! Names, titles and error details are rendered verbatim into terminal cells.
//! A hostile or broken payload could carry escape sequences (clipboard writes,
//! cursor movement, title changes), so everything passes through
//! [`sanitize_display_text`] before it reaches the UI.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
/// C1 equivalent of `ESC [`.
const C1_CSI: char = '\u{9b}';
/// C1 equivalent of `ESC ]`.
const C1_OSC: char = '\u{9d}';

/// Reduce `input` to a single printable line.
///
/// - ANSI escape sequences (CSI, OSC, DCS and two-byte forms) are removed.
/// - Line breaks and tabs collapse into a single space.
/// - Remaining C0/C1 control characters and DEL are dropped.
///
/// Returns `Cow::Borrowed` when nothing needs to change.
///
/// ```
/// use triad_types::sanitize_display_text;
///
/// assert_eq!(sanitize_display_text("Leanne Graham"), "Leanne Graham");
/// assert_eq!(sanitize_display_text("a\x1b[2Jb"), "ab");
/// assert_eq!(sanitize_display_text("two\nlines"), "two lines");
/// ```
#[must_use]
pub fn sanitize_display_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(char::is_control) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        match c {
            ESC => match chars.next() {
                Some('[') => skip_csi(&mut chars),
                Some(']' | 'P' | 'X' | '^' | '_') => skip_string(&mut chars),
                // Two-byte sequence (or a trailing ESC): the next char is consumed.
                _ => {}
            },
            C1_CSI => skip_csi(&mut chars),
            C1_OSC => skip_string(&mut chars),
            '\n' | '\r' | '\t' => pending_space = true,
            c if c.is_control() => {}
            c => {
                if pending_space && !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }

    Cow::Owned(out)
}

/// Skip CSI parameters up to and including the final byte (`@`..`~`).
fn skip_csi<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) {
    for c in chars.by_ref() {
        if ('@'..='~').contains(&c) {
            break;
        }
    }
}

/// Skip an OSC/DCS-style string terminated by BEL or `ESC \`.
fn skip_string<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) {
    while let Some(c) = chars.next() {
        if c == BEL || c == '\u{9c}' {
            break;
        }
        if c == ESC {
            if chars.peek() == Some(&'\\') {
                chars.next();
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_is_borrowed() {
        let out = sanitize_display_text("Ervin Howell (Shanna@melissa.tv)");
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn unicode_is_preserved() {
        assert_eq!(sanitize_display_text("Zoë 東京"), "Zoë 東京");
    }

    #[test]
    fn strips_csi_sequences() {
        assert_eq!(sanitize_display_text("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(sanitize_display_text("a\x1b[10;20Hb"), "ab");
    }

    #[test]
    fn strips_osc_with_bel_and_st() {
        assert_eq!(sanitize_display_text("x\x1b]52;c;ZXZpbA==\x07y"), "xy");
        assert_eq!(sanitize_display_text("x\x1b]0;title\x1b\\y"), "xy");
    }

    #[test]
    fn strips_c1_sequences() {
        assert_eq!(sanitize_display_text("a\u{9b}2Jb"), "ab");
        assert_eq!(sanitize_display_text("a\u{9d}0;t\u{9c}b"), "ab");
    }

    #[test]
    fn collapses_line_breaks() {
        assert_eq!(
            sanitize_display_text("sunt aut facere\nrepellat"),
            "sunt aut facere repellat"
        );
        assert_eq!(sanitize_display_text("a\r\n\tb"), "a b");
        assert_eq!(sanitize_display_text("\nleading"), "leading");
    }

    #[test]
    fn drops_other_controls() {
        assert_eq!(sanitize_display_text("a\x00b\x07c\x7fd"), "abcd");
    }

    #[test]
    fn trailing_escape_is_dropped() {
        assert_eq!(sanitize_display_text("end\x1b"), "end");
        assert_eq!(sanitize_display_text("end\x1b[12"), "end");
    }
}

//! Conversion of raw line bytes to screen text.

use unicode_width::UnicodeWidthChar;

/// Tab stops are every this many screen columns.
pub const TAB_STOP: usize = 8;

/// Decode `bytes` for display: tabs expand to the next tab stop and control
/// characters are shown in caret form (`^A`).
pub fn display_text(bytes: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(bytes);
    let mut out = String::with_capacity(decoded.len());
    let mut column = 0;
    for ch in decoded.chars() {
        column += push_display_char(&mut out, ch, column);
    }
    out
}

/// Screen column of byte offset `byte_col` within `bytes`.
pub fn screen_column(bytes: &[u8], byte_col: usize) -> usize {
    let prefix = &bytes[..byte_col.min(bytes.len())];
    let mut sink = String::new();
    String::from_utf8_lossy(prefix)
        .chars()
        .fold(0, |column, ch| column + push_display_char(&mut sink, ch, column))
}

/// Append the display form of `ch` at `column`, returning its width.
fn push_display_char(out: &mut String, ch: char, column: usize) -> usize {
    match ch {
        '\t' => {
            let width = TAB_STOP - column % TAB_STOP;
            out.extend(std::iter::repeat_n(' ', width));
            width
        }
        '\u{7f}' => {
            out.push_str("^?");
            2
        }
        c if c.is_ascii_control() => {
            out.push('^');
            out.push(char::from(u8::try_from(c).unwrap_or(0) | 0x40));
            2
        }
        c => {
            out.push(c);
            c.width().unwrap_or(0)
        }
    }
}

use std::borrow::Cow;

/// Stable handle to a [`Line`] inside a [`LineStore`](super::LineStore).
///
/// The generation changes every time a slot is freed, so a handle kept
/// past the line's removal no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId {
    index: usize,
    generation: u32,
}

impl LineId {
    pub(super) const fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(super) const fn index(self) -> usize {
        self.index
    }

    pub(super) const fn generation(self) -> u32 {
        self.generation
    }
}

/// One record of text plus its links in the chain.
///
/// `text` holds the raw bytes of the record including its terminator, so a
/// file round-trips byte-for-byte. Only the last line of a file may lack a
/// terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub(super) text: Vec<u8>,
    pub(super) prev: Option<LineId>,
    pub(super) next: Option<LineId>,
}

impl Line {
    pub(super) const fn new(text: Vec<u8>) -> Self {
        Self {
            text,
            prev: None,
            next: None,
        }
    }

    /// Raw bytes, terminator included.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Length in bytes, terminator included.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub const fn prev(&self) -> Option<LineId> {
        self.prev
    }

    pub const fn next(&self) -> Option<LineId> {
        self.next
    }

    /// Whether the text ends with `\n`.
    pub fn is_terminated(&self) -> bool {
        self.text.last() == Some(&b'\n')
    }

    /// Byte length of the line terminator (`\r\n`, `\n`, or none).
    pub fn terminator_len(&self) -> usize {
        if self.text.ends_with(b"\r\n") {
            2
        } else {
            usize::from(self.is_terminated())
        }
    }

    /// Column just past the last content byte, i.e. where the terminator starts.
    pub fn end_column(&self) -> usize {
        self.text.len() - self.terminator_len()
    }

    /// The terminator bytes themselves, empty for an unterminated line.
    pub fn terminator(&self) -> &[u8] {
        &self.text[self.end_column()..]
    }

    /// Text without its terminator.
    pub fn content(&self) -> &[u8] {
        &self.text[..self.end_column()]
    }

    /// Text without its terminator, decoded lossily for display.
    pub fn to_display(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.content())
    }

    /// Start of the character that ends right before `col`.
    pub fn prev_boundary(&self, col: usize) -> usize {
        let mut at = col.min(self.text.len()).saturating_sub(1);
        while at > 0 && is_continuation(self.text[at]) {
            at -= 1;
        }
        at
    }

    /// Start of the character following the one at `col`.
    pub fn next_boundary(&self, col: usize) -> usize {
        let len = self.text.len();
        let mut at = (col + 1).min(len);
        while at < len && is_continuation(self.text[at]) {
            at += 1;
        }
        at
    }
}

const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> Line {
        Line::new(text.as_bytes().to_vec())
    }

    #[test]
    fn test_end_column_skips_newline() {
        assert_eq!(line("hello\n").end_column(), 5);
        assert_eq!(line("hello").end_column(), 5);
        assert_eq!(line("").end_column(), 0);
    }

    #[test]
    fn test_end_column_skips_crlf() {
        let l = line("hello\r\n");
        assert_eq!(l.terminator_len(), 2);
        assert_eq!(l.end_column(), 5);
        assert_eq!(l.content(), b"hello");
        assert_eq!(l.terminator(), b"\r\n");
        assert_eq!(line("x").terminator(), b"");
    }

    #[test]
    fn test_to_display_strips_terminator() {
        assert_eq!(line("how are you\n").to_display(), "how are you");
    }

    #[test]
    fn test_boundaries_step_over_multibyte() {
        let l = line("caf\u{e9}!\n");
        // 'é' occupies bytes 3..5
        assert_eq!(l.next_boundary(3), 5);
        assert_eq!(l.prev_boundary(5), 3);
        assert_eq!(l.prev_boundary(3), 2);
        assert_eq!(l.prev_boundary(0), 0);
    }
}

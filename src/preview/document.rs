// Rope-backed document text. Offsets are char offsets, lines are 1-based.

use std::borrow::Cow;

use ropey::Rope;

/// A single line of the document, without its line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number
    pub number: usize,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    rope: Rope,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Full text. Borrowed when the rope is a single chunk.
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    pub fn byte_to_char(&self, byte: usize) -> usize {
        self.rope.byte_to_char(byte.min(self.rope.len_bytes()))
    }

    /// Line containing `offset`. Offsets past the end resolve to the last line.
    pub fn line_at(&self, offset: usize) -> Line {
        let offset = offset.min(self.len_chars());
        let idx = self.rope.char_to_line(offset);
        self.line_by_index(idx)
    }

    /// Line by 1-based number.
    pub fn line(&self, number: usize) -> Option<Line> {
        if number == 0 || number > self.lines() {
            return None;
        }
        Some(self.line_by_index(number - 1))
    }

    fn line_by_index(&self, idx: usize) -> Line {
        let from = self.rope.line_to_char(idx);
        let slice = self.rope.line(idx);
        let mut len = slice.len_chars();
        // Strip the trailing break, counting CRLF as one
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        } else if len > 0 && matches!(slice.char(len - 1), '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}') {
            len -= 1;
        }
        Line {
            number: idx + 1,
            from,
            to: from + len,
        }
    }

    /// Text in `[from, to)`, or `None` when the range is out of bounds.
    pub fn slice(&self, from: usize, to: usize) -> Option<String> {
        if from > to || to > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(from..to).to_string())
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.rope.get_char(offset)
    }
}

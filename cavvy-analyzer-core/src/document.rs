use lsp_types::{Position, Range};

/// Line-oriented view over a caller-supplied source buffer.
///
/// The engine holds no buffer abstraction of its own; this is the minimal
/// per-line access every pass needs, built fresh per call and discarded with
/// it. Columns follow the host buffer's indexing: zero-based UTF-16 code
/// units, the same unit `lsp_types::Position` carries.
pub struct Document<'a> {
    text: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> Document<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: text.lines().collect(),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }

    pub fn lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().copied()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// UTF-16 length of a string, as a column count.
pub fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

/// UTF-16 column of a byte offset into `s`. The offset must lie on a char
/// boundary (regex match boundaries always do).
pub fn utf16_col(s: &str, byte_offset: usize) -> u32 {
    utf16_len(&s[..byte_offset])
}

/// Single-line range spanning `[start_col, end_col)` on `line`.
pub fn line_range(line: u32, start_col: u32, end_col: u32) -> Range {
    Range::new(Position::new(line, start_col), Position::new(line, end_col))
}

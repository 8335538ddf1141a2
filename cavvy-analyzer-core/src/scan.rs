use crate::document::Document;

/// Classification of a whole line after masking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Nothing but whitespace.
    Blank,
    /// No code survived masking: full-line `//` comments and block-comment
    /// interiors.
    Comment,
    Code,
}

/// A string or char literal opened on a line and not closed before its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unterminated {
    pub quote: char,
    /// UTF-16 column of the opening quote.
    pub column: u32,
}

/// One source line with literals and comments scrubbed out.
///
/// `code` keeps code characters verbatim and replaces every masked character
/// with one space per UTF-16 code unit, so the UTF-16 length of any prefix of
/// `code` equals the host buffer's column at that point. Downstream passes
/// (brackets, symbols, lint rules) match against `code` and never see the
/// inside of a literal or comment.
#[derive(Debug, Clone)]
pub struct ScannedLine<'a> {
    pub raw: &'a str,
    pub code: String,
    pub kind: LineKind,
    pub unterminated: Option<Unterminated>,
}

/// The shared tokenizing pass: line classifier and lexical scrubber in one.
///
/// Carries the only cross-line lexical state, the open-block-comment flag.
/// Block comments do not nest; the first `*/` closes, and text after it on
/// the same line re-enters normal scanning. String and char literals never
/// span lines; a backslash consumes the following character unconditionally.
pub struct Scanner {
    in_block_comment: bool,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            in_block_comment: false,
        }
    }

    /// Scan every line of `document` top to bottom.
    pub fn scan<'a>(document: &Document<'a>) -> Vec<ScannedLine<'a>> {
        let mut scanner = Self::new();
        document
            .lines()
            .map(|line| scanner.scan_line(line))
            .collect()
    }

    pub fn scan_line<'a>(&mut self, raw: &'a str) -> ScannedLine<'a> {
        let mut code = String::with_capacity(raw.len());
        let mut unterminated = None;
        let mut chars = raw.char_indices().peekable();
        let mut column: u32 = 0;
        let mut saw_code = false;

        while let Some((_, ch)) = chars.next() {
            if self.in_block_comment {
                if ch == '*' && matches!(chars.peek(), Some((_, '/'))) {
                    chars.next();
                    self.in_block_comment = false;
                    mask(&mut code, "*/");
                    column += 2;
                } else {
                    mask_char(&mut code, ch);
                    column += utf16_width(ch);
                }
                continue;
            }

            match ch {
                '/' if matches!(chars.peek(), Some((_, '/'))) => {
                    // Line comment: mask through end of line.
                    mask(&mut code, "//");
                    for (_, rest) in chars.by_ref() {
                        mask_char(&mut code, rest);
                    }
                    break;
                }
                '/' if matches!(chars.peek(), Some((_, '*'))) => {
                    chars.next();
                    self.in_block_comment = true;
                    mask(&mut code, "/*");
                    column += 2;
                }
                '"' | '\'' => {
                    let quote = ch;
                    let open_column = column;
                    saw_code = true;
                    mask_char(&mut code, ch);
                    column += 1;
                    let mut closed = false;
                    while let Some((_, lit)) = chars.next() {
                        mask_char(&mut code, lit);
                        column += utf16_width(lit);
                        if lit == '\\' {
                            if let Some((_, escaped)) = chars.next() {
                                mask_char(&mut code, escaped);
                                column += utf16_width(escaped);
                            }
                        } else if lit == quote {
                            closed = true;
                            break;
                        }
                    }
                    if !closed && unterminated.is_none() {
                        unterminated = Some(Unterminated {
                            quote,
                            column: open_column,
                        });
                    }
                }
                _ => {
                    code.push(ch);
                    column += utf16_width(ch);
                    if !ch.is_whitespace() {
                        saw_code = true;
                    }
                }
            }
        }

        // A line that is nothing but a masked literal is still code; only
        // comment-scrubbing may empty a line into Comment kind.
        let kind = if raw.trim().is_empty() {
            LineKind::Blank
        } else if saw_code {
            LineKind::Code
        } else {
            LineKind::Comment
        };

        ScannedLine {
            raw,
            code,
            kind,
            unterminated,
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

fn utf16_width(ch: char) -> u32 {
    ch.len_utf16() as u32
}

fn mask_char(code: &mut String, ch: char) {
    for _ in 0..ch.len_utf16() {
        code.push(' ');
    }
}

fn mask(code: &mut String, ascii: &str) {
    for _ in 0..ascii.len() {
        code.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_one(raw: &str) -> ScannedLine<'_> {
        Scanner::new().scan_line(raw)
    }

    #[test]
    fn masks_string_literals() {
        let line = scan_one(r#"string s = "{ ( ["; int x;"#);
        assert_eq!(line.kind, LineKind::Code);
        assert!(!line.code.contains('{'));
        assert!(!line.code.contains('('));
        assert!(line.code.contains("int x;"));
        assert!(line.unterminated.is_none());
    }

    #[test]
    fn escaped_quote_does_not_terminate() {
        let line = scan_one(r#"string s = "a\"b"; {"#);
        assert!(line.unterminated.is_none());
        assert!(line.code.contains('{'));
    }

    #[test]
    fn reports_unterminated_string_at_opening_quote() {
        let line = scan_one(r#"string s = "abc"#);
        let unterminated = line.unterminated.expect("literal left open");
        assert_eq!(unterminated.quote, '"');
        assert_eq!(unterminated.column, 11);
    }

    #[test]
    fn line_comment_masks_rest_of_line() {
        let line = scan_one("int x = 1; // { ( [");
        assert_eq!(line.kind, LineKind::Code);
        assert!(!line.code.contains('{'));
        assert!(line.code.contains("int x = 1;"));
    }

    #[test]
    fn full_line_comment_is_comment_kind() {
        assert_eq!(scan_one("   // just a note").kind, LineKind::Comment);
        assert_eq!(scan_one("").kind, LineKind::Blank);
        assert_eq!(scan_one("   \t").kind, LineKind::Blank);
    }

    #[test]
    fn block_comment_spans_lines() {
        let mut scanner = Scanner::new();
        let first = scanner.scan_line("int a; /* start");
        assert_eq!(first.kind, LineKind::Code);
        assert!(first.code.contains("int a;"));

        let interior = scanner.scan_line("still inside {");
        assert_eq!(interior.kind, LineKind::Comment);
        assert!(!interior.code.contains('{'));

        let last = scanner.scan_line("end */ int b;");
        assert_eq!(last.kind, LineKind::Code);
        assert!(last.code.contains("int b;"));
    }

    #[test]
    fn block_comment_closed_on_same_line() {
        let mut scanner = Scanner::new();
        let line = scanner.scan_line("int a; /* note */ int b;");
        assert!(line.code.contains("int a;"));
        assert!(line.code.contains("int b;"));
        let next = scanner.scan_line("int c;");
        assert_eq!(next.kind, LineKind::Code);
    }

    #[test]
    fn quotes_inside_comments_are_invisible() {
        let mut scanner = Scanner::new();
        let line = scanner.scan_line(r#"int a; // it's fine"#);
        assert!(line.unterminated.is_none());
        let line = scanner.scan_line(r#"/* "open "#);
        assert!(line.unterminated.is_none());
    }

    #[test]
    fn masking_preserves_utf16_columns() {
        // The ellipsis is one UTF-16 unit; the masked literal must keep the
        // columns of everything after it unchanged.
        let line = scan_one("string s = \"é…\"; {");
        let brace_col = line
            .code
            .char_indices()
            .find(|&(_, c)| c == '{')
            .map(|(i, _)| crate::document::utf16_col(&line.code, i))
            .unwrap();
        let raw_col = line
            .raw
            .char_indices()
            .find(|&(_, c)| c == '{')
            .map(|(i, _)| crate::document::utf16_col(line.raw, i))
            .unwrap();
        assert_eq!(brace_col, raw_col);
    }
}

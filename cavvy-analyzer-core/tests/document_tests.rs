use cavvy_analyzer_core::document::{utf16_col, utf16_len, Document};
use cavvy_analyzer_core::scan::LineKind;
use cavvy_analyzer_core::Scanner;

/// Test basic line access over a buffer.
#[test]
fn test_line_table() {
    let document = Document::new("int a;\nint b;\n");

    assert_eq!(document.line_count(), 2);
    assert_eq!(document.line(0), Some("int a;"));
    assert_eq!(document.line(1), Some("int b;"));
    assert_eq!(document.line(2), None);
    assert!(!document.is_empty());
}

/// Test that an empty buffer has no lines.
#[test]
fn test_empty_buffer() {
    let document = Document::new("");
    assert_eq!(document.line_count(), 0);
    assert!(document.is_empty());
}

/// Test that carriage returns are not part of line content.
#[test]
fn test_crlf_line_endings() {
    let document = Document::new("int a;\r\nint b;\r\n");
    assert_eq!(document.line(0), Some("int a;"));
    assert_eq!(document.line(1), Some("int b;"));
}

/// Test UTF-16 column arithmetic for multi-byte and astral characters.
#[test]
fn test_utf16_columns() {
    assert_eq!(utf16_len("hello"), 5);
    // 'é' is two bytes but one UTF-16 unit.
    assert_eq!(utf16_len("héllo"), 5);
    // '𝔘' is four bytes and two UTF-16 units.
    assert_eq!(utf16_len("𝔘x"), 3);
    assert_eq!(utf16_col("𝔘x", 4), 2);
    assert_eq!(utf16_col("héllo", 3), 2);
}

/// Test the line classification of a mixed buffer.
#[test]
fn test_scan_classification() {
    let source = "\
// comment
int x;

/* start
inside
end */ int y;
";
    let document = Document::new(source);
    let lines = Scanner::scan(&document);

    let kinds: Vec<_> = lines.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LineKind::Comment,
            LineKind::Code,
            LineKind::Blank,
            LineKind::Comment,
            LineKind::Comment,
            LineKind::Code,
        ]
    );
    assert!(lines[5].code.contains("int y;"));
}

/// Test that unterminated-literal columns use UTF-16 units.
#[test]
fn test_unterminated_literal_utf16_column() {
    let document = Document::new("string s = \"𝔘");
    let lines = Scanner::scan(&document);

    let open = lines[0].unterminated.expect("literal left open");
    assert_eq!(open.column, 11);
    // The line is 11 units + quote + 2-unit astral char.
    assert_eq!(utf16_len(lines[0].raw), 14);
}

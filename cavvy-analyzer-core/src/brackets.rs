use lsp_types::{Diagnostic, DiagnosticSeverity, Position};

use crate::diagnostics::{codes, diagnostic};
use crate::document::line_range;
use crate::scan::ScannedLine;

/// An open-but-unclosed bracket, tracked on the matcher's stack for the
/// duration of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketFrame {
    pub character: char,
    pub position: Position,
}

/// Match `{ ( [` against their closers across the whole scrubbed buffer.
///
/// A closer with no matching opener (or the wrong opener on top of the
/// stack) is reported where it stands, and the stack is left alone so the
/// stranded opener still surfaces as unclosed at end of input.
pub fn match_brackets(lines: &[ScannedLine<'_>]) -> Vec<Diagnostic> {
    let mut stack: Vec<BracketFrame> = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line_no = index as u32;
        let mut column: u32 = 0;
        for ch in line.code.chars() {
            match ch {
                '{' | '(' | '[' => {
                    stack.push(BracketFrame {
                        character: ch,
                        position: Position::new(line_no, column),
                    });
                }
                '}' | ')' | ']' => {
                    let expected = expected_opener(ch);
                    match stack.last() {
                        Some(top) if top.character == expected => {
                            stack.pop();
                        }
                        _ => {
                            diagnostics.push(diagnostic(
                                line_range(line_no, column, column + 1),
                                DiagnosticSeverity::ERROR,
                                codes::UNMATCHED_BRACE,
                                format!("Mismatched bracket: expected '{expected}' before '{ch}'"),
                            ));
                        }
                    }
                }
                _ => {}
            }
            column += ch.len_utf16() as u32;
        }
    }

    for frame in stack {
        let closer = matching_closer(frame.character);
        diagnostics.push(diagnostic(
            line_range(
                frame.position.line,
                frame.position.character,
                frame.position.character + 1,
            ),
            DiagnosticSeverity::ERROR,
            codes::UNCLOSED_BRACE,
            format!(
                "Unclosed bracket: '{}' has no matching '{closer}'",
                frame.character
            ),
        ));
    }

    diagnostics
}

fn expected_opener(closer: char) -> char {
    match closer {
        '}' => '{',
        ')' => '(',
        _ => '[',
    }
}

fn matching_closer(opener: char) -> char {
    match opener {
        '{' => '}',
        '(' => ')',
        _ => ']',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::scan::Scanner;

    fn run(source: &str) -> Vec<Diagnostic> {
        let document = Document::new(source);
        let lines = Scanner::scan(&document);
        match_brackets(&lines)
    }

    #[test]
    fn balanced_brackets_are_silent() {
        assert!(run("class A { void f(int[] xs) { g(xs[0]); } }").is_empty());
    }

    #[test]
    fn reports_unmatched_closer_at_its_position() {
        let diagnostics = run("int x;\nint y;\n    }");
        assert_eq!(diagnostics.len(), 1);
        let diag = &diagnostics[0];
        assert_eq!(diag.range.start, Position::new(2, 4));
        assert!(diag.message.contains('{'));
        assert!(diag.message.contains('}'));
    }

    #[test]
    fn reports_unclosed_opener_at_end_of_input() {
        let diagnostics = run("void f() {\n  int x;\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start, Position::new(0, 9));
        assert!(diagnostics[0].message.contains('}'));
    }

    #[test]
    fn wrong_type_closer_leaves_opener_on_stack() {
        // `(` closed by `]`: the closer is unmatched, and the `(` must still
        // be reported as unclosed afterwards.
        let diagnostics = run("f(x]");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].code,
            Some(lsp_types::NumberOrString::String(
                codes::UNMATCHED_BRACE.to_string()
            ))
        );
        assert_eq!(
            diagnostics[1].code,
            Some(lsp_types::NumberOrString::String(
                codes::UNCLOSED_BRACE.to_string()
            ))
        );
    }

    #[test]
    fn brackets_inside_literals_are_invisible() {
        assert!(run(r#"string s = "{ ( [";"#).is_empty());
        assert!(run("char c = '{';").is_empty());
    }

    #[test]
    fn brackets_inside_comments_are_invisible() {
        assert!(run("// { ( [\n/* {{{ */\nint x;").is_empty());
    }
}

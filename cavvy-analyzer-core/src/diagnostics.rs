use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Range};

use crate::document::{line_range, utf16_col, utf16_len};
use crate::parser::{LineDecl, Patterns, ScanContext};
use crate::scan::{LineKind, ScannedLine};

/// Source tag carried by every diagnostic the engine produces itself.
pub const SOURCE: &str = "cavvy-analyzer";

/// Stable identifiers for every diagnostic the engine can report.
pub mod codes {
    pub const UNMATCHED_BRACE: &str = "unmatched-brace";
    pub const UNCLOSED_BRACE: &str = "unclosed-brace";
    pub const UNCLOSED_STRING: &str = "unclosed-string";
    pub const UNCLOSED_CHAR: &str = "unclosed-char";
    pub const CLASS_NAME_CONVENTION: &str = "class-name-convention";
    pub const METHOD_NAME_CONVENTION: &str = "method-name-convention";
    pub const VARIABLE_NAME_CONVENTION: &str = "variable-name-convention";
    pub const MISSING_METHOD_BODY: &str = "missing-method-body";
    pub const RETURN_OUTSIDE_METHOD: &str = "return-outside-method";
    pub const EMPTY_STATEMENT: &str = "empty-statement";
    pub const UNREACHABLE_CODE: &str = "unreachable-code";
    pub const MISSING_SEMICOLON: &str = "missing-semicolon";
}

pub(crate) fn diagnostic(
    range: Range,
    severity: DiagnosticSeverity,
    code: &str,
    message: String,
) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(severity),
        code: Some(NumberOrString::String(code.to_string())),
        code_description: None,
        source: Some(SOURCE.to_string()),
        message,
        related_information: None,
        tags: None,
        data: None,
    }
}

/// The line-level rule set. Every rule is a heuristic: it produces zero
/// diagnostics rather than failing when a line does not fit its pattern.
pub struct Linter<'p> {
    patterns: &'p Patterns,
}

impl<'p> Linter<'p> {
    pub fn new(patterns: &'p Patterns) -> Self {
        Self { patterns }
    }

    /// Run every rule over the scrubbed line stream, in document order.
    pub fn lint(&self, lines: &[ScannedLine<'_>]) -> Vec<Diagnostic> {
        let mut context = ScanContext::new();
        let mut diagnostics = Vec::new();
        let mut prev_ended_with_return = false;

        for (index, line) in lines.iter().enumerate() {
            if line.kind != LineKind::Code {
                continue;
            }
            let line_no = index as u32;
            let eol = utf16_len(line.raw);

            if let Some(open) = line.unterminated {
                let (code, message) = match open.quote {
                    '"' => (codes::UNCLOSED_STRING, "Unterminated string literal"),
                    _ => (codes::UNCLOSED_CHAR, "Unterminated character literal"),
                };
                diagnostics.push(diagnostic(
                    line_range(line_no, open.column, eol),
                    DiagnosticSeverity::ERROR,
                    code,
                    message.to_string(),
                ));
            }

            if let Some(decl) = self.patterns.match_decl(line) {
                match &decl {
                    LineDecl::Class {
                        name,
                        name_span,
                        decl_end,
                        ..
                    } => {
                        if !starts_uppercase(name) {
                            diagnostics.push(diagnostic(
                                line_range(line_no, name_span.0, name_span.1),
                                DiagnosticSeverity::INFORMATION,
                                codes::CLASS_NAME_CONVENTION,
                                format!("Class name '{name}' should start with an uppercase letter"),
                            ));
                        }
                        context.note_decl(&decl);
                        // A member declared on the class-head line still
                        // counts for naming and for the method context.
                        if let Some(method) =
                            self.patterns.match_trailing_method(&line.code, *decl_end)
                        {
                            self.check_method_name(&method, line_no, &mut diagnostics);
                            context.note_decl(&method);
                        }
                    }
                    LineDecl::Method { name, .. } => {
                        self.check_method_name(&decl, line_no, &mut diagnostics);
                        if !line.code.contains('{') {
                            diagnostics.push(diagnostic(
                                line_range(line_no, eol.saturating_sub(1), eol),
                                DiagnosticSeverity::WARNING,
                                codes::MISSING_METHOD_BODY,
                                format!("Method '{name}' may be missing its opening '{{'"),
                            ));
                        }
                        context.note_decl(&decl);
                    }
                }
            }

            if context.enclosing_method().is_none() {
                if let Some(found) = self.patterns.return_token.find(&line.code) {
                    diagnostics.push(diagnostic(
                        line_range(
                            line_no,
                            utf16_col(&line.code, found.start()),
                            utf16_col(&line.code, found.end()),
                        ),
                        DiagnosticSeverity::ERROR,
                        codes::RETURN_OUTSIDE_METHOD,
                        "'return' used outside of a method body".to_string(),
                    ));
                }
            }

            if let Some(caps) = self.patterns.var_naming.captures(&line.code) {
                let name = caps.get(1).expect("variable name group");
                if starts_uppercase(name.as_str()) {
                    diagnostics.push(diagnostic(
                        line_range(
                            line_no,
                            utf16_col(&line.code, name.start()),
                            utf16_col(&line.code, name.end()),
                        ),
                        DiagnosticSeverity::INFORMATION,
                        codes::VARIABLE_NAME_CONVENTION,
                        format!(
                            "Variable name '{}' should start with a lowercase letter",
                            name.as_str()
                        ),
                    ));
                }
            }

            if let Some(found) = line.code.find(";;") {
                let column = utf16_col(&line.code, found);
                diagnostics.push(diagnostic(
                    line_range(line_no, column, column + 2),
                    DiagnosticSeverity::WARNING,
                    codes::EMPTY_STATEMENT,
                    "Empty statement (consecutive semicolons)".to_string(),
                ));
            }

            if prev_ended_with_return && !line.code.trim_start().starts_with('}') {
                diagnostics.push(diagnostic(
                    line_range(line_no, 0, eol),
                    DiagnosticSeverity::WARNING,
                    codes::UNREACHABLE_CODE,
                    "Unreachable code after 'return'".to_string(),
                ));
            }

            self.check_missing_semicolon(line, line_no, eol, &mut diagnostics);

            prev_ended_with_return = self.patterns.return_line.is_match(line.code.trim_end());
            context.observe_braces(line);
        }

        diagnostics
    }

    fn check_method_name(
        &self,
        decl: &LineDecl,
        line_no: u32,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if let LineDecl::Method { name, name_span, .. } = decl {
            if starts_uppercase(name) {
                diagnostics.push(diagnostic(
                    line_range(line_no, name_span.0, name_span.1),
                    DiagnosticSeverity::INFORMATION,
                    codes::METHOD_NAME_CONVENTION,
                    format!("Method name '{name}' should start with a lowercase letter"),
                ));
            }
        }
    }

    /// Statement-termination heuristic. The exception list is deliberately
    /// incomplete; lines it cannot judge stay silent elsewhere, not here.
    fn check_missing_semicolon(
        &self,
        line: &ScannedLine<'_>,
        line_no: u32,
        eol: u32,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let code = line.code.trim();
        if code.is_empty() || code.ends_with(['{', '}', ')', ';', ':']) {
            return;
        }

        let raw = line.raw.trim_start();
        if raw.starts_with("/*")
            || raw.starts_with('*')
            || raw.starts_with("import")
            || raw.starts_with("package")
            || raw.starts_with('@')
            || raw.starts_with('#')
        {
            return;
        }

        if self.patterns.control_flow.is_match(&line.code)
            || self.patterns.case_label.is_match(&line.code)
            || self.patterns.else_keyword.is_match(&line.code)
        {
            return;
        }

        diagnostics.push(diagnostic(
            line_range(line_no, eol.saturating_sub(1), eol),
            DiagnosticSeverity::WARNING,
            codes::MISSING_SEMICOLON,
            "Statement may be missing a terminating ';'".to_string(),
        ));
    }
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source tag for diagnostics that came from an external checker run.
pub const CHECKER_SOURCE: &str = "cayc";

/// Severity levels an external checker reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckerSeverity {
    Error,
    Warning,
    Info,
}

/// One diagnostic line emitted by a compiler-like checker
/// (`cayc --check file.cay` style). Line and column are kept 1-based, as
/// printed; conversion to the engine's 0-based positions happens in
/// [`CheckerDiagnostic::to_lsp`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerDiagnostic {
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
    pub severity: CheckerSeverity,
    pub message: String,
}

impl CheckerDiagnostic {
    pub fn to_lsp(&self) -> Diagnostic {
        let start = Position {
            line: self.line.saturating_sub(1),
            character: self.column.saturating_sub(1),
        };
        let end = Position {
            line: start.line,
            character: start.character + 1,
        };
        Diagnostic {
            range: Range { start, end },
            severity: Some(match self.severity {
                CheckerSeverity::Error => DiagnosticSeverity::ERROR,
                CheckerSeverity::Warning => DiagnosticSeverity::WARNING,
                CheckerSeverity::Info => DiagnosticSeverity::INFORMATION,
            }),
            code: Some(NumberOrString::String("compiler-error".to_string())),
            code_description: None,
            source: Some(CHECKER_SOURCE.to_string()),
            message: self.message.clone(),
            related_information: None,
            tags: None,
            data: None,
        }
    }
}

/// Parse one `path:line:col: severity: message` line. Lines in any other
/// shape are not an error; they are simply not diagnostics.
pub fn parse_checker_line(line: &str) -> Option<CheckerDiagnostic> {
    let captures = regex::Regex::new(r"(?i)^(.+?):(\d+):(\d+):\s*(error|warning|note|info):\s*(.+)$")
        .ok()?
        .captures(line)?;

    let path = PathBuf::from(captures.get(1)?.as_str());
    let line_number: u32 = captures.get(2)?.as_str().parse().ok()?;
    let column: u32 = captures.get(3)?.as_str().parse().ok()?;
    let severity = match captures.get(4)?.as_str().to_ascii_lowercase().as_str() {
        "warning" => CheckerSeverity::Warning,
        "note" | "info" => CheckerSeverity::Info,
        _ => CheckerSeverity::Error,
    };
    let message = captures.get(5)?.as_str().trim().to_string();

    Some(CheckerDiagnostic {
        path,
        line: line_number,
        column,
        severity,
        message,
    })
}

/// Parse a whole checker output block, ignoring lines that do not match.
pub fn parse_checker_output(output: &str) -> Vec<CheckerDiagnostic> {
    output.lines().filter_map(parse_checker_line).collect()
}

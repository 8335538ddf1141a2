use anyhow::Result;
use lsp_types::Diagnostic;
use tracing::debug;

use crate::brackets::match_brackets;
use crate::diagnostics::Linter;
use crate::document::Document;
use crate::parser::{Patterns, SymbolExtractor};
use crate::scan::Scanner;
use crate::symbol::SymbolTable;

/// The analysis façade: symbol extraction and diagnostics over one buffer.
///
/// Holds only the compiled pattern set; every call builds its scan state
/// fresh and returns owned results, so one engine can serve any number of
/// buffers, from any thread, with no coordination.
pub struct AnalysisEngine {
    patterns: Patterns,
}

impl AnalysisEngine {
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: Patterns::new()?,
        })
    }

    /// Full re-scan of `text` into a symbol table.
    pub fn parse_symbols(&self, text: &str) -> SymbolTable {
        let document = Document::new(text);
        let lines = Scanner::scan(&document);
        let table = SymbolExtractor::new(&self.patterns).extract(&lines);
        debug!(
            "extracted {} symbols from {} lines",
            table.len(),
            document.line_count()
        );
        table
    }

    /// Full re-scan of `text` into diagnostics, in document order. Per-line
    /// emission order is stable; bracket diagnostics merge in by position.
    pub fn analyze(&self, text: &str) -> Vec<Diagnostic> {
        let document = Document::new(text);
        let lines = Scanner::scan(&document);

        let mut diagnostics = Linter::new(&self.patterns).lint(&lines);
        diagnostics.extend(match_brackets(&lines));
        diagnostics.sort_by_key(|d| (d.range.start.line, d.range.start.character));

        debug!(
            "found {} diagnostics in {} lines",
            diagnostics.len(),
            document.line_count()
        );
        diagnostics
    }
}

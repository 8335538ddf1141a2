use cavvy_analyzer_core::{Symbol, SymbolTable};
use clap::ValueEnum;
use lsp_types::{Diagnostic, DiagnosticSeverity};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File extension of Cavvy sources.
pub const SOURCE_EXTENSION: &str = "cay";

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("no such file or directory: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to walk {}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Expand the requested paths into a list of source files. Files are taken
/// as given; directories are searched recursively for `.cay` files in
/// filename order.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CollectError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|source| CollectError::Walk {
                    path: path.clone(),
                    source,
                })?;
                if entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext == SOURCE_EXTENSION)
                {
                    files.push(entry.into_path());
                }
            }
        } else {
            return Err(CollectError::Missing(path.clone()));
        }
    }
    Ok(files)
}

/// Everything reported for one checked file.
#[derive(Serialize)]
pub struct FileReport {
    path: PathBuf,
    diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbols: Option<SymbolTable>,
}

impl FileReport {
    pub fn new(path: PathBuf, diagnostics: Vec<Diagnostic>, symbols: Option<SymbolTable>) -> Self {
        Self {
            path,
            diagnostics,
            symbols,
        }
    }

    pub fn print_text(&self) {
        for diagnostic in &self.diagnostics {
            println!("{}", render_diagnostic(&self.path, diagnostic));
        }
        if let Some(symbols) = &self.symbols {
            println!("{}:", self.path.display());
            for symbol in symbols.symbols() {
                println!("{}", render_symbol(symbol));
            }
        }
    }
}

/// One diagnostic in `path:line:col: severity: message` form, 1-based.
pub fn render_diagnostic(path: &Path, diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}:{}: {}: {}",
        path.display(),
        diagnostic.range.start.line + 1,
        diagnostic.range.start.character + 1,
        severity_label(diagnostic.severity),
        diagnostic.message
    )
}

fn severity_label(severity: Option<DiagnosticSeverity>) -> &'static str {
    match severity {
        Some(s) if s == DiagnosticSeverity::WARNING => "warning",
        Some(s) if s == DiagnosticSeverity::INFORMATION || s == DiagnosticSeverity::HINT => "info",
        _ => "error",
    }
}

fn render_symbol(symbol: &Symbol) -> String {
    let indent = if symbol.parent().is_some() { "    " } else { "" };
    let kind = kind_label(symbol);
    match symbol.detail() {
        Some(detail) => format!(
            "{indent}{kind} {} ({detail}) @ {}:{}",
            symbol.name,
            symbol.range.start.line + 1,
            symbol.range.start.character + 1
        ),
        None => format!(
            "{indent}{kind} {} @ {}:{}",
            symbol.name,
            symbol.range.start.line + 1,
            symbol.range.start.character + 1
        ),
    }
}

fn kind_label(symbol: &Symbol) -> &'static str {
    use cavvy_analyzer_core::SymbolKind;
    match symbol.kind {
        SymbolKind::Class { .. } => "class",
        SymbolKind::Method { .. } => "method",
        SymbolKind::Field { .. } => "field",
        SymbolKind::Variable { .. } => "variable",
        SymbolKind::Parameter { .. } => "parameter",
        SymbolKind::Reference => "reference",
    }
}

use anyhow::{Context, Result};
use cavvy_analyzer_core::AnalysisEngine;
use clap::Parser;
use lsp_types::DiagnosticSeverity;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;

use report::{FileReport, OutputFormat};

/// Syntax checker and symbol outliner for Cavvy source files.
///
/// Diagnostics print one per line as `path:line:col: severity: message`,
/// 1-based, the format editor integrations expect from a `--check` tool.
#[derive(Parser)]
#[command(name = "cavvy-check", version)]
struct Args {
    /// Files or directories to check; directories are searched for .cay files
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Also print a symbol outline per file
    #[arg(long)]
    symbols: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() -> ExitCode {
    // Initialize logging; reports go to stdout, logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cavvy_check=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::from(1),
        Ok(false) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cavvy-check: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Check every requested file. Returns whether any error-severity
/// diagnostic was reported.
fn run(args: &Args) -> Result<bool> {
    let engine = AnalysisEngine::new()?;
    let files = report::collect_sources(&args.paths)?;
    info!("checking {} files", files.len());

    let mut had_errors = false;
    let mut reports = Vec::new();

    for path in files {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let diagnostics = engine.analyze(&text);
        had_errors |= diagnostics
            .iter()
            .any(|d| d.severity == Some(DiagnosticSeverity::ERROR));

        let symbols = args.symbols.then(|| engine.parse_symbols(&text));
        reports.push(FileReport::new(path, diagnostics, symbols));
    }

    match args.format {
        OutputFormat::Text => {
            for file_report in &reports {
                file_report.print_text();
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    Ok(had_errors)
}

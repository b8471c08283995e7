//! Output formatting for the harness binary

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use secspell_harness::{TestResult, TestRunSummary};
use tracing::info;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

fn result_row(result: &TestResult) -> Vec<Cell> {
    let (mark, color) = if result.pass {
        ("✓", Color::Green)
    } else {
        ("✗", Color::Red)
    };
    vec![
        Cell::new(mark).fg(color),
        Cell::new(&result.name),
        Cell::new(result.error.as_deref().unwrap_or("")),
    ]
}

/// Table with one row per result
pub fn results_table(summary: &TestRunSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["", "Test", "Error"]);
    for result in summary.details() {
        table.add_row(result_row(result));
    }
    table
}

/// One-line totals, e.g. `Total: 6 | Passed: 6 | Failed: 0 | Success Rate: 100.0%`.
pub fn totals_line(summary: &TestRunSummary) -> String {
    format!(
        "Total: {} | Passed: {} | Failed: {} | Success Rate: {}%",
        summary.total(),
        summary.passed(),
        summary.failed(),
        summary.success_rate()
    )
}

/// Print the summary of a run
pub fn print_summary(summary: &TestRunSummary, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{}", results_table(summary));
            let totals = totals_line(summary);
            if summary.all_passed() {
                println!("{}", totals.green());
            } else {
                println!("{}", totals.red());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary).unwrap_or_default());
        }
    }
}

/// Write the summary to `test-results.json` under `output_dir`.
pub fn write_results(output_dir: &Path, summary: &TestRunSummary) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let path = output_dir.join("test-results.json");
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

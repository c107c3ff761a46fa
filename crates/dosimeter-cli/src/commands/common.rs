//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use dosimeter_analysis::{DoseReport, ErrorReport, IntegrationResults, Method};
use dosimeter_io::{CsvTable, read_csv};
use std::path::{Path, PathBuf};

/// Read a CSV file, naming it in the error.
pub fn load_table(path: &Path) -> anyhow::Result<CsvTable> {
    read_csv(path).with_context(|| format!("reading {}", path.display()))
}

/// Numeric column of a CSV file.
pub fn load_column(path: &Path, column: &str) -> anyhow::Result<Vec<f64>> {
    let table = load_table(path)?;
    table
        .column_f64(column)
        .with_context(|| format!("reading column '{}' of {}", column, path.display()))
}

/// `name` in the same directory as `input`.
pub fn sibling(input: &Path, name: &str) -> PathBuf {
    input
        .parent()
        .map_or_else(|| PathBuf::from(name), |dir| dir.join(name))
}

/// Percentage formatted for file names, e.g. `80`.
pub fn percent_tag(percent: f64) -> String {
    format!("{percent:.0}")
}

/// Parse a method name for clap's `value_parser`.
pub fn parse_method(s: &str) -> Result<Method, String> {
    Method::from_name(s).ok_or_else(|| {
        format!(
            "Unknown method '{}' (expected trapezoidal, simpson13 or simpson38)",
            s
        )
    })
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.6e}"))
}

/// Print one line per method, with errors when a report is given.
pub fn print_results(results: &IntegrationResults, report: Option<&ErrorReport>) {
    if let Some(report) = report {
        println!(
            "  Reference: {:.2} dB -> {:.6e}",
            report.reference_db, report.reference_energy
        );
    }
    println!(
        "  {:<14} {:>16} {:>14} {:>10}",
        "Method", "Integral", "Rel. error", "Error %"
    );
    println!("  {}", "-".repeat(57));
    for entry in results.iter() {
        let error = report.and_then(|r| r.get(entry.method));
        let relative = error.map_or_else(|| "N/A".to_string(), |e| format!("{:.6}", e.relative));
        let percent = error.map_or_else(|| "N/A".to_string(), |e| format!("{:.4}", e.percent));
        println!(
            "  {:<14} {:>16} {:>14} {:>10}",
            entry.method.label(),
            fmt_value(entry.value()),
            relative,
            percent
        );
        if let Some(reason) = entry.unavailable_reason() {
            println!("    ({reason})");
        }
    }
    if let Some(report) = report {
        match report.best {
            Some(best) => println!("  Best method: {best}"),
            None => println!("  Best method: N/A"),
        }
    }
}

/// Print a dose report.
pub fn print_dose(dose: &DoseReport) {
    println!("  LAeq,T:   {:.2} dB(A)", dose.laeq_db);
    println!("  Lex,8h:   {:.2} dB(A)", dose.lex_8h_db);
    println!("  Dose:     {:.4} %", dose.dose_percent);
    println!("  Duration: {:.4} h", dose.duration_hours);
}

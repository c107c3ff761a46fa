//! Quadrature of one CSV column.

use super::common::{load_column, print_results};
use clap::Args;
use dosimeter_analysis::SampleSeries;
use dosimeter_io::write_results_csv;
use std::path::PathBuf;

#[derive(Args)]
pub struct IntegrateArgs {
    /// Input CSV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Column to integrate
    #[arg(short, long)]
    column: String,

    /// Treat the column as levels in dB and integrate their intensity
    #[arg(long)]
    db: bool,

    /// Sampling interval in seconds
    #[arg(long, default_value = "1.0")]
    interval: f64,

    /// Calibration level in dB; enables the error table
    #[arg(long)]
    reference_db: Option<f64>,

    /// Write the results table to a CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: IntegrateArgs) -> anyhow::Result<()> {
    let values = load_column(&args.input, &args.column)?;
    let series = if args.db {
        SampleSeries::from_levels_db(&values, args.interval)?
    } else {
        SampleSeries::uniform(values, args.interval)?
    };

    let results = series.integrate();
    let report = args
        .reference_db
        .map(|db| series.rank(&results, db))
        .transpose()?;

    println!(
        "Integrating '{}' of {} ({} samples, dt = {} s)",
        args.column,
        args.input.display(),
        series.len(),
        series.interval()
    );
    print_results(&results, report.as_ref());

    if let Some(output) = &args.output {
        write_results_csv(output, &results, report.as_ref())?;
        println!("\nSaved results to {}", output.display());
    }
    Ok(())
}

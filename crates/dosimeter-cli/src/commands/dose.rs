//! LAeq,T and noise dose of one CSV column.

use super::common::{load_column, parse_method, print_dose};
use anyhow::Context;
use clap::Args;
use dosimeter_analysis::{Method, SampleSeries, laeq_and_dose};
use dosimeter_io::write_dose_csv;
use std::path::PathBuf;

#[derive(Args)]
pub struct DoseArgs {
    /// Input CSV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Column holding intensities (or levels with --db)
    #[arg(short, long)]
    column: String,

    /// Treat the column as levels in dB
    #[arg(long)]
    db: bool,

    /// Sampling interval in seconds
    #[arg(long, default_value = "1.0")]
    interval: f64,

    /// Take the energy from this quadrature rule instead of the sample sum
    /// (trapezoidal, simpson13, simpson38)
    #[arg(short, long, value_parser = parse_method)]
    method: Option<Method>,

    /// Write LAeq, dose and duration to a CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: DoseArgs) -> anyhow::Result<()> {
    let values = load_column(&args.input, &args.column)?;
    let series = if args.db {
        SampleSeries::from_levels_db(&values, args.interval)?
    } else {
        SampleSeries::uniform(values, args.interval)?
    };

    let energy = match args.method {
        Some(method) => method
            .integrate(series.times(), series.values())
            .with_context(|| format!("{method} cannot integrate {} samples", series.len()))?,
        None => series.sample_energy(),
    };
    let dose = laeq_and_dose(energy, series.duration_seconds())?;

    println!(
        "Dose of '{}' ({} samples, {}):",
        args.column,
        series.len(),
        args.method.map_or("sample sum", |m| m.label())
    );
    print_dose(&dose);

    if let Some(output) = &args.output {
        write_dose_csv(output, &dose)?;
        println!("\nSaved dose to {}", output.display());
    }
    Ok(())
}

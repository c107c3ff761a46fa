//! Homogeneous percentage reduction of a CSV file.

use super::common::{load_table, percent_tag, sibling};
use anyhow::Context;
use clap::Args;
use dosimeter_io::write_csv;
use std::path::PathBuf;

#[derive(Args)]
pub struct ReduceArgs {
    /// Input CSV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Percentage of rows to remove, in [0, 100)
    #[arg(short, long)]
    percent: f64,

    /// Output CSV file (default: reducido_<P>%.csv next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ReduceArgs) -> anyhow::Result<()> {
    let table = load_table(&args.input)?;
    let reduced = table
        .reduced(args.percent)
        .with_context(|| format!("reducing {} by {}%", args.input.display(), args.percent))?;

    let output = args.output.unwrap_or_else(|| {
        sibling(
            &args.input,
            &format!("reducido_{}%.csv", percent_tag(args.percent)),
        )
    });
    write_csv(&output, &reduced)?;
    tracing::info!(rows = reduced.len(), path = %output.display(), "reduced");

    println!(
        "Reduced to about {}% ({} of {} rows). Saved to {}",
        percent_tag(100.0 - args.percent),
        reduced.len(),
        table.len(),
        output.display()
    );
    Ok(())
}

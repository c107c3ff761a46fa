//! 25 + 6k truncation of a CSV file.

use super::common::{load_table, sibling};
use clap::Args;
use dosimeter_io::write_csv;
use std::path::PathBuf;

#[derive(Args)]
pub struct TruncateArgs {
    /// Input CSV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output CSV file (default: truncado_25_6k.csv next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: TruncateArgs) -> anyhow::Result<()> {
    let table = load_table(&args.input)?;
    let (truncated, was_cut) = table.truncated_to_admissible()?;

    if !was_cut {
        println!(
            "No truncation needed: {} rows already match 25 + 6k.",
            table.len()
        );
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| sibling(&args.input, "truncado_25_6k.csv"));
    write_csv(&output, &truncated)?;
    tracing::info!(rows = truncated.len(), path = %output.display(), "truncated");

    println!(
        "Truncated {} -> {} rows. Saved to {}",
        table.len(),
        truncated.len(),
        output.display()
    );
    Ok(())
}

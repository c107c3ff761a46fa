//! GeoJSON to CSV conversion.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct GeojsonArgs {
    /// Input GeoJSON file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output CSV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

pub fn run(args: GeojsonArgs) -> anyhow::Result<()> {
    let rows = dosimeter_io::geojson_to_csv(&args.input, &args.output)
        .with_context(|| format!("converting {}", args.input.display()))?;

    if rows == 0 {
        println!("No features to convert; nothing written.");
    } else {
        println!("Wrote {} rows to {}", rows, args.output.display());
    }
    Ok(())
}

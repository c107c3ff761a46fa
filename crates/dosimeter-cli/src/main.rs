//! Dosimeter CLI - Command-line interface for noise dose estimation.

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use dosimeter_config::LoggingConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dosimeter")]
#[command(author, version, about = "Quadrature-validated noise dose estimation", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write the log to this file
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: truncate, integrate, rank, export, dose; then
    /// repeat on a homogeneously reduced copy
    Run(commands::run::RunArgs),

    /// Truncate a CSV to the largest 25 + 6k row count
    Truncate(commands::truncate::TruncateArgs),

    /// Remove a percentage of rows homogeneously
    Reduce(commands::reduce::ReduceArgs),

    /// Integrate a column with the trapezoidal and Simpson rules
    Integrate(commands::integrate::IntegrateArgs),

    /// Compute LAeq,T and noise dose of a column
    Dose(commands::dose::DoseArgs),

    /// Convert a GeoJSON FeatureCollection to CSV
    Geojson(commands::geojson::GeojsonArgs),

    /// Create or inspect the pipeline configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log = logging::LogOptions {
        verbose: cli.verbose,
        file: cli.log_file,
    };

    // the pipeline takes its log defaults from the configuration
    let run_config = match &cli.command {
        Commands::Run(args) => match commands::run::resolve_config(args) {
            Ok(config) => Some(config),
            Err(e) => {
                let fallback = LoggingConfig::default();
                logging::init(&log, &fallback.level, fallback.file.as_deref())?;
                tracing::error!(error = %format!("{e:#}"), "pipeline failed");
                return Err(e);
            }
        },
        _ => None,
    };
    let (level, file) = run_config
        .as_ref()
        .map_or((logging::DEFAULT_LEVEL, None), |c| {
            (c.logging.level.as_str(), c.logging.file.as_deref())
        });
    logging::init(&log, level, file)?;

    match cli.command {
        Commands::Run(args) => commands::run::run(&args, run_config.unwrap_or_default()),
        Commands::Truncate(args) => commands::truncate::run(args),
        Commands::Reduce(args) => commands::reduce::run(args),
        Commands::Integrate(args) => commands::integrate::run(args),
        Commands::Dose(args) => commands::dose::run(args),
        Commands::Geojson(args) => commands::geojson::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}

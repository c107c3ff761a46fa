//! The full pipeline: complete pass, then a homogeneously reduced pass.

use super::common::{load_table, percent_tag, print_dose, print_results};
use anyhow::Context;
use clap::Args;
use dosimeter_analysis::SampleSeries;
use dosimeter_config::{PipelineConfig, find_config, paths::CONFIG_FILE_NAME};
use dosimeter_io::{
    CsvTable, RunSummary, write_charts, write_csv, write_dose_csv, write_intensity_csv,
    write_results_csv, write_statistics_csv, write_summary_json,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct RunArgs {
    /// Configuration file (default: the user's dosimeter.toml, if any)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Measurement CSV
    #[arg(long)]
    input: Option<PathBuf>,

    /// Column holding the sound level in dB
    #[arg(long)]
    column: Option<String>,

    /// Directory for the CSV exports
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory for the charts
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Percentage of rows removed for the reduced pass
    #[arg(long)]
    percent: Option<f64>,

    /// Calibration level in dB
    #[arg(long)]
    reference_db: Option<f64>,

    /// Sampling interval in seconds
    #[arg(long)]
    interval: Option<f64>,

    /// Skip chart generation
    #[arg(long)]
    no_charts: bool,

    /// Print a JSON summary instead of tables
    #[arg(long)]
    json: bool,
}

/// Load the configuration named by `--config` (or the user default) and
/// apply the command-line overrides.
pub fn resolve_config(args: &RunArgs) -> anyhow::Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => match find_config(CONFIG_FILE_NAME) {
            Some(path) => PipelineConfig::load(&path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => PipelineConfig::default(),
        },
    };

    if let Some(input) = &args.input {
        config.input.clone_from(input);
    }
    if let Some(column) = &args.column {
        config.level_column.clone_from(column);
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir.clone_from(dir);
    }
    if let Some(dir) = &args.chart_dir {
        config.chart_dir.clone_from(dir);
    }
    if let Some(percent) = args.percent {
        config.reduction_percent = percent;
    }
    if let Some(reference) = args.reference_db {
        config.reference_db = reference;
    }
    if let Some(interval) = args.interval {
        config.sample_interval_s = interval;
    }
    if args.no_charts {
        config.charts = false;
    }

    config.validate()?;
    Ok(config)
}

/// File names written by one pass.
struct PassFiles {
    label: String,
    intensity: String,
    results: String,
    statistics: String,
    dose: String,
    chart_prefix: String,
}

impl PassFiles {
    fn complete() -> Self {
        Self {
            label: "completo".to_string(),
            intensity: "intensidad_completa.csv".to_string(),
            results: "resultados_completos.csv".to_string(),
            statistics: "estadisticos_completos.csv".to_string(),
            dose: "laeq_dosis_completo.csv".to_string(),
            chart_prefix: "grafico_completo".to_string(),
        }
    }

    fn reduced(kept: &str) -> Self {
        Self {
            label: format!("reducido_{kept}"),
            intensity: format!("intensidad_reducido_{kept}.csv"),
            results: format!("resultados_reducido_{kept}.csv"),
            statistics: format!("estadisticos_reducido_{kept}.csv"),
            dose: format!("laeq_dosis_reducido_{kept}.csv"),
            chart_prefix: format!("grafico_reducido_{kept}"),
        }
    }
}

pub fn run(args: &RunArgs, config: PipelineConfig) -> anyhow::Result<()> {
    tracing::info!(input = %config.input.display(), "starting pipeline");
    let outcome = execute(&config, args.json);
    match &outcome {
        Ok(()) => tracing::info!("pipeline finished"),
        Err(e) => tracing::error!(error = %format!("{e:#}"), "pipeline failed"),
    }
    outcome
}

fn execute(config: &PipelineConfig, json: bool) -> anyhow::Result<()> {
    let out = &config.output_dir;
    std::fs::create_dir_all(out)
        .with_context(|| format!("creating output directory {}", out.display()))?;

    // 1. 25 + 6k truncation
    let table = load_table(&config.input)?;
    tracing::info!(rows = table.len(), columns = table.headers().len(), "input loaded");
    let (truncated, was_cut) = table
        .truncated_to_admissible()
        .context("truncating to 25 + 6k rows")?;
    if was_cut {
        let path = out.join("truncado_25_6k.csv");
        write_csv(&path, &truncated)?;
        tracing::info!(rows = truncated.len(), path = %path.display(), "truncated");
    } else {
        tracing::info!(rows = truncated.len(), "no truncation needed; using input as is");
    }

    // 2. complete series
    if !json {
        println!("Complete series ({} samples)", truncated.len());
    }
    let complete = run_pass(config, &truncated, &PassFiles::complete(), json)?;

    // 3. homogeneous reduction of the truncated data
    let kept = percent_tag(config.kept_percent());
    let reduced = truncated
        .reduced(config.reduction_percent)
        .with_context(|| format!("reducing by {}%", config.reduction_percent))?;
    let reduced_path = out.join(format!("reducido_{kept}.csv"));
    write_csv(&reduced_path, &reduced)?;
    tracing::info!(rows = reduced.len(), path = %reduced_path.display(), "reduced");

    if !json {
        println!("\nReduced to {kept}% ({} samples)", reduced.len());
    }
    let reduced_summary = run_pass(config, &reduced, &PassFiles::reduced(&kept), json)?;

    let summaries = [complete, reduced_summary];
    write_summary_json(out.join("resumen.json"), &summaries)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }
    Ok(())
}

fn run_pass(
    config: &PipelineConfig,
    table: &CsvTable,
    files: &PassFiles,
    quiet: bool,
) -> anyhow::Result<RunSummary> {
    let out = &config.output_dir;
    let levels = table
        .column_f64(&config.level_column)
        .with_context(|| format!("reading level column '{}'", config.level_column))?;
    let series = SampleSeries::from_levels_db(&levels, config.sample_interval_s)?;
    write_intensity_csv(out.join(&files.intensity), &series)?;

    tracing::debug!(pass = %files.label, samples = series.len(), "integrating");
    let results = series.integrate();
    let report = series.rank(&results, config.reference_db)?;
    write_results_csv(out.join(&files.results), &results, Some(&report))?;

    if let Some(stats) = series.statistics() {
        write_statistics_csv(out.join(&files.statistics), &stats)?;
    }

    if config.charts {
        write_charts(&config.chart_dir, &files.chart_prefix, &series, &results)?;
    }

    let dose = match report.best.and_then(|m| results.get(m)) {
        Some(energy) => {
            let dose = series.dose(energy)?;
            write_dose_csv(out.join(&files.dose), &dose)?;
            Some(dose)
        }
        None => {
            tracing::warn!(pass = %files.label, "no integration method available; dose export skipped");
            None
        }
    };

    if !quiet {
        print_results(&results, Some(&report));
        if let Some(dose) = &dose {
            print_dose(dose);
        }
    }

    Ok(RunSummary::new(
        files.label.clone(),
        &series,
        &results,
        &report,
        dose.as_ref(),
    ))
}

//! Flat CSV and JSON exports of a pipeline pass.
//!
//! Column names match the files the measurement team already consumes:
//!
//! | File            | Columns                                              |
//! |-----------------|------------------------------------------------------|
//! | intensity       | `Tiempo (s),intensidad`                              |
//! | results         | `metodo,integral,error_relativo,error_porcentual`    |
//! | statistics      | `media,desv_std,min,max,mediana`                     |
//! | dose            | `LAeq_T_dB,dosis_%,T_horas`                          |
//!
//! Absent values (an unavailable rule, a method with no error) are written
//! as empty cells.

use crate::Result;
use crate::csv::{CsvTable, write_csv};
use dosimeter_analysis::{
    DoseReport, ErrorReport, IntegrationResults, SampleSeries, SeriesStatistics,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

fn write_table(path: &Path, names: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    let table = CsvTable::new(headers(names), rows)?;
    write_csv(path, &table)?;
    tracing::info!(path = %path.display(), rows = table.len(), "exported table");
    Ok(())
}

/// Export the time/intensity pairs of a series.
pub fn write_intensity_csv(path: impl AsRef<Path>, series: &SampleSeries) -> Result<()> {
    let rows = series
        .times()
        .iter()
        .zip(series.values())
        .map(|(t, v)| vec![t.to_string(), v.to_string()])
        .collect();
    write_table(path.as_ref(), &["Tiempo (s)", "intensidad"], rows)
}

/// Export one row per integration method with its value and errors.
///
/// Without a report the error columns are left empty.
pub fn write_results_csv(
    path: impl AsRef<Path>,
    results: &IntegrationResults,
    report: Option<&ErrorReport>,
) -> Result<()> {
    let rows = results
        .iter()
        .map(|entry| {
            let error = report.and_then(|r| r.get(entry.method));
            vec![
                entry.method.label().to_string(),
                cell(entry.value()),
                cell(error.map(|e| e.relative)),
                cell(error.map(|e| e.percent)),
            ]
        })
        .collect();
    write_table(
        path.as_ref(),
        &["metodo", "integral", "error_relativo", "error_porcentual"],
        rows,
    )
}

/// Export a single row of descriptive statistics.
pub fn write_statistics_csv(path: impl AsRef<Path>, stats: &SeriesStatistics) -> Result<()> {
    let row = [stats.mean, stats.std_dev, stats.min, stats.max, stats.median]
        .iter()
        .map(|v| v.to_string())
        .collect();
    write_table(
        path.as_ref(),
        &["media", "desv_std", "min", "max", "mediana"],
        vec![row],
    )
}

/// Export a single row with LAeq,T, dose and duration.
pub fn write_dose_csv(path: impl AsRef<Path>, dose: &DoseReport) -> Result<()> {
    let row = vec![
        dose.laeq_db.to_string(),
        dose.dose_percent.to_string(),
        dose.duration_hours.to_string(),
    ];
    write_table(
        path.as_ref(),
        &["LAeq_T_dB", "dosis_%", "T_horas"],
        vec![row],
    )
}

/// One method's line in a [`RunSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMethod {
    /// Display label of the method.
    pub method: String,
    /// Integral, absent when the method was unavailable.
    pub integral: Option<f64>,
    /// Relative error against the reference.
    pub relative_error: Option<f64>,
    /// Relative error in percent.
    pub percent_error: Option<f64>,
    /// Why the method could not run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable: Option<String>,
}

/// Machine-readable record of one pipeline pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Pass name, e.g. `completo` or `reducido_80`.
    pub label: String,
    /// Number of samples integrated.
    pub samples: usize,
    /// Sampling interval in seconds.
    pub interval_s: f64,
    /// Calibration level in dB.
    pub reference_db: f64,
    /// Calibration level rescaled to energy.
    pub reference_energy: f64,
    /// Every method, available or not.
    pub methods: Vec<SummaryMethod>,
    /// Label of the best method.
    pub best: Option<String>,
    /// Statistics of the intensity series.
    pub statistics: Option<SummaryStatistics>,
    /// Dose from the best method.
    pub dose: Option<SummaryDose>,
}

/// [`SeriesStatistics`] in serializable form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Median.
    pub median: f64,
}

/// [`DoseReport`] in serializable form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryDose {
    /// LAeq,T in dB(A).
    pub laeq_db: f64,
    /// Lex,8h in dB(A).
    pub lex_8h_db: f64,
    /// Dose in percent.
    pub dose_percent: f64,
    /// Measurement duration in hours.
    pub duration_hours: f64,
}

impl From<&SeriesStatistics> for SummaryStatistics {
    fn from(s: &SeriesStatistics) -> Self {
        Self {
            mean: s.mean,
            std_dev: s.std_dev,
            min: s.min,
            max: s.max,
            median: s.median,
        }
    }
}

impl From<&DoseReport> for SummaryDose {
    fn from(d: &DoseReport) -> Self {
        Self {
            laeq_db: d.laeq_db,
            lex_8h_db: d.lex_8h_db,
            dose_percent: d.dose_percent,
            duration_hours: d.duration_hours,
        }
    }
}

impl RunSummary {
    /// Collect the outputs of one pass.
    pub fn new(
        label: impl Into<String>,
        series: &SampleSeries,
        results: &IntegrationResults,
        report: &ErrorReport,
        dose: Option<&DoseReport>,
    ) -> Self {
        let methods = results
            .iter()
            .map(|entry| {
                let error = report.get(entry.method);
                SummaryMethod {
                    method: entry.method.label().to_string(),
                    integral: entry.value(),
                    relative_error: error.map(|e| e.relative),
                    percent_error: error.map(|e| e.percent),
                    unavailable: entry.unavailable_reason().map(ToString::to_string),
                }
            })
            .collect();

        Self {
            label: label.into(),
            samples: series.len(),
            interval_s: series.interval(),
            reference_db: report.reference_db,
            reference_energy: report.reference_energy,
            methods,
            best: report.best.map(|m| m.label().to_string()),
            statistics: series.statistics().as_ref().map(SummaryStatistics::from),
            dose: dose.map(SummaryDose::from),
        }
    }
}

/// Write pass summaries as pretty-printed JSON.
pub fn write_summary_json(path: impl AsRef<Path>, summaries: &[RunSummary]) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(summaries)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), passes = summaries.len(), "exported summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::read_csv;
    use dosimeter_analysis::Method;

    fn pass(n: usize) -> (SampleSeries, IntegrationResults, ErrorReport) {
        let series = SampleSeries::from_levels_db(&vec![90.4; n], 1.0).unwrap();
        let results = series.integrate();
        let report = series.rank(&results, 90.4).unwrap();
        (series, results, report)
    }

    #[test]
    fn results_csv_has_empty_cells_for_unavailable_methods() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resultados.csv");
        // 30 samples: Simpson 1/3 needs an odd count
        let (_, results, report) = pass(30);
        write_results_csv(&path, &results, Some(&report)).unwrap();

        let table = read_csv(&path).unwrap();
        assert_eq!(
            table.headers(),
            &["metodo", "integral", "error_relativo", "error_porcentual"]
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0][0], "Trapecios");
        assert!(!table.rows()[0][1].is_empty());
        assert_eq!(table.rows()[1][0], "Simpson 1/3");
        assert_eq!(table.rows()[1][1], "");
        assert_eq!(table.rows()[1][2], "");
    }

    #[test]
    fn statistics_and_dose_are_single_rows() {
        let dir = tempfile::tempdir().unwrap();
        let (series, results, report) = pass(31);

        let stats_path = dir.path().join("estadisticos.csv");
        write_statistics_csv(&stats_path, &series.statistics().unwrap()).unwrap();
        let stats = read_csv(&stats_path).unwrap();
        assert_eq!(stats.headers(), &["media", "desv_std", "min", "max", "mediana"]);
        assert_eq!(stats.column_f64("desv_std").unwrap(), vec![0.0]);

        let energy = results.get(report.best.unwrap()).unwrap();
        let dose = series.dose(energy).unwrap();
        let dose_path = dir.path().join("dosis.csv");
        write_dose_csv(&dose_path, &dose).unwrap();
        let table = read_csv(&dose_path).unwrap();
        assert_eq!(table.headers(), &["LAeq_T_dB", "dosis_%", "T_horas"]);
        let laeq = table.column_f64("LAeq_T_dB").unwrap()[0];
        assert_eq!(laeq, dose.laeq_db);
    }

    #[test]
    fn intensity_csv_lists_every_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intensidad.csv");
        let (series, _, _) = pass(25);
        write_intensity_csv(&path, &series).unwrap();

        let table = read_csv(&path).unwrap();
        assert_eq!(table.headers(), &["Tiempo (s)", "intensidad"]);
        assert_eq!(table.len(), 25);
        assert_eq!(table.column_f64("Tiempo (s)").unwrap()[24], 25.0);
    }

    #[test]
    fn summary_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumen.json");
        let (series, results, report) = pass(30);
        let summary = RunSummary::new("completo", &series, &results, &report, None);

        assert_eq!(summary.methods.len(), 3);
        assert!(summary.methods[1].unavailable.is_some());
        assert_eq!(summary.best.as_deref(), Some(Method::Trapezoidal.label()));

        write_summary_json(&path, std::slice::from_ref(&summary)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<RunSummary> = serde_json::from_str(&text).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].label, "completo");
        assert_eq!(back[0].samples, 30);
        assert_eq!(back[0].best, summary.best);
        assert!(back[0].dose.is_none());
        assert_eq!(back[0].methods[2].integral, None);
        let rel = (back[0].reference_energy - summary.reference_energy).abs();
        assert!(rel <= summary.reference_energy * 1e-12);
    }
}

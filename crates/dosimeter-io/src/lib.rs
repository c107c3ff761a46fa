//! File I/O layer for the dosimeter pipeline.
//!
//! This crate provides:
//!
//! - **CSV tables**: [`CsvTable`] reads and writes RFC 4180 tables and
//!   applies the `25 + 6k` truncation and homogeneous reduction row-wise
//! - **Exports**: intensity series, integration results, statistics and dose
//!   as flat CSV files, plus a JSON [`RunSummary`]
//! - **Charts**: SVG time-series and method-comparison charts via `plotters`
//! - **GeoJSON**: [`geojson_to_csv`] flattens a FeatureCollection into a
//!   CSV table with a WKT geometry column
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dosimeter_io::{read_csv, write_results_csv};
//! use dosimeter_analysis::SampleSeries;
//!
//! let table = read_csv("data/datos.csv")?;
//! let levels = table.column_f64("leq_mean")?;
//! let series = SampleSeries::from_levels_db(&levels, 1.0)?;
//!
//! let results = series.integrate();
//! let report = series.rank(&results, 90.4)?;
//! write_results_csv("resultados.csv", &results, Some(&report))?;
//! ```

mod chart;
mod csv;
mod export;
mod geojson;

pub use chart::{ChartPaths, comparison_chart_svg, series_chart_svg, write_charts};
pub use csv::{CsvTable, read_csv, write_csv};
pub use export::{
    RunSummary, SummaryMethod, write_dose_csv, write_intensity_csv, write_results_csv,
    write_statistics_csv, write_summary_json,
};
pub use geojson::{GEOMETRY_COLUMN, geojson_to_csv, geojson_to_table, geometry_to_wkt};

/// Error types for pipeline file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CSV input.
    #[error("CSV error at line {line}: {reason}")]
    Csv {
        /// 1-based line where the problem was found.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// The requested column is not in the table header.
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    /// A cell of a numeric column does not parse as a number.
    #[error("Row {row}, column '{column}': cannot parse '{value}' as a number")]
    ParseNumber {
        /// 0-based data row index.
        row: usize,
        /// Column name.
        column: String,
        /// Offending cell text.
        value: String,
    },

    /// Chart rendering failed.
    #[error("Chart rendering error: {0}")]
    Chart(String),

    /// The document is not a usable GeoJSON FeatureCollection.
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    /// Sampling or analysis failure while transforming a table.
    #[error("Analysis error: {0}")]
    Analysis(#[from] dosimeter_analysis::AnalysisError),
}

/// Convenience result type for pipeline I/O.
pub type Result<T> = std::result::Result<T, Error>;

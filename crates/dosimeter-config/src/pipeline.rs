//! Pipeline configuration file format.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Levels accepted by `[logging] level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Settings of a pipeline run.
///
/// # TOML Format
///
/// ```toml
/// input = "data/datos.csv"
/// level_column = "leq_mean"
/// output_dir = "data/resultados"
/// chart_dir = "IMG"
/// reduction_percent = 20.0
/// reference_db = 90.4
/// sample_interval_s = 1.0
/// charts = true
///
/// [logging]
/// level = "info"
/// file = "data/pipeline.log"
/// ```
///
/// Missing keys take the values shown above.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Measurement CSV.
    pub input: PathBuf,

    /// Column holding the sound level in dB.
    pub level_column: String,

    /// Directory for the CSV exports.
    pub output_dir: PathBuf,

    /// Directory for the SVG charts.
    pub chart_dir: PathBuf,

    /// Percentage of rows removed by the reduced pass.
    pub reduction_percent: f64,

    /// Calibration level the integrals are compared against, dB.
    pub reference_db: f64,

    /// Time between samples, seconds.
    pub sample_interval_s: f64,

    /// Whether to write charts.
    pub charts: bool,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// `[logging]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `RUST_LOG` nor `-v` is given.
    pub level: String,

    /// Log file written alongside the console output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/datos.csv"),
            level_column: "leq_mean".to_string(),
            output_dir: PathBuf::from("data/resultados"),
            chart_dir: PathBuf::from("IMG"),
            reduction_percent: 20.0,
            reference_db: 90.4,
            sample_interval_s: 1.0,
            charts: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some(PathBuf::from("data/pipeline.log")),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every numeric setting and the column name.
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.reduction_percent.is_finite()
            && (0.0..100.0).contains(&self.reduction_percent))
        {
            return Err(ConfigError::invalid(
                "reduction_percent",
                format!("must be in [0, 100), got {}", self.reduction_percent),
            ));
        }
        if !(self.sample_interval_s.is_finite() && self.sample_interval_s > 0.0) {
            return Err(ConfigError::invalid(
                "sample_interval_s",
                format!("must be positive, got {}", self.sample_interval_s),
            ));
        }
        if !self.reference_db.is_finite() {
            return Err(ConfigError::invalid(
                "reference_db",
                format!("must be finite, got {}", self.reference_db),
            ));
        }
        if self.level_column.trim().is_empty() {
            return Err(ConfigError::invalid("level_column", "must not be empty"));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!(
                    "expected one of {}, got '{}'",
                    LOG_LEVELS.join(", "),
                    self.logging.level
                ),
            ));
        }
        Ok(())
    }

    /// Percentage of rows kept by the reduced pass, e.g. `80` for a 20%
    /// reduction. Used in output file names.
    pub fn kept_percent(&self) -> f64 {
        100.0 - self.reduction_percent
    }
}

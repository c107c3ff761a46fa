//! Time-stamped sample series

use crate::dosimetry::{DoseReport, laeq_and_dose, levels_to_intensity, rectangle_energy};
use crate::error::{AnalysisError, Result};
use crate::quadrature::{IntegrationResults, integrate_all};
use crate::ranking::{ErrorReport, rank_methods_with_interval};
use crate::sampling::{admissible_count, reduce_homogeneous, truncate};
use crate::stats::{SeriesStatistics, describe};

/// Ordered `(time, value)` pairs sampled at a nominal interval.
///
/// Times are finite and strictly increasing and the series holds at least
/// one sample. Operations never mutate a series; they return new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    times: Vec<f64>,
    values: Vec<f64>,
    interval: f64,
}

fn check_interval(interval: f64) -> Result<()> {
    if interval.is_finite() && interval > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidInterval(interval))
    }
}

impl SampleSeries {
    /// Build a series from explicit time stamps.
    ///
    /// `interval` is the nominal sampling interval used for durations and
    /// reference energies.
    pub fn new(times: Vec<f64>, values: Vec<f64>, interval: f64) -> Result<Self> {
        check_interval(interval)?;
        if times.len() != values.len() {
            return Err(AnalysisError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if times.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }
        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(AnalysisError::NonMonotonicTime { index });
        }
        if let Some(index) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AnalysisError::NonMonotonicTime { index: index + 1 });
        }
        Ok(Self {
            times,
            values,
            interval,
        })
    }

    /// Uniform series with times `interval, 2 * interval, ..., N * interval`.
    pub fn uniform(values: Vec<f64>, interval: f64) -> Result<Self> {
        check_interval(interval)?;
        let times = (1..=values.len()).map(|i| i as f64 * interval).collect();
        Self::new(times, values, interval)
    }

    /// Uniform intensity series from levels in dB.
    pub fn from_levels_db(levels_db: &[f64], interval: f64) -> Result<Self> {
        Self::uniform(levels_to_intensity(levels_db), interval)
    }

    /// Time stamps.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sample values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Nominal sampling interval in seconds.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a series holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Nominal measurement duration, `N * interval`.
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 * self.interval
    }

    /// Prefix of the admissible `25 + 6k` length. Returns `None` when the
    /// series already has an admissible length.
    pub fn truncated_to_admissible(&self) -> Result<Option<Self>> {
        let m = admissible_count(self.len())?;
        let cut = truncate(&self.values, m);
        if !cut.is_truncated() {
            return Ok(None);
        }
        Ok(Some(Self {
            times: self.times[..m].to_vec(),
            values: cut.rows().to_vec(),
            interval: self.interval,
        }))
    }

    /// Homogeneously reduced copy, re-indexed as a uniform series at the
    /// same nominal interval.
    pub fn reduced(&self, percent: f64) -> Result<Self> {
        let values = reduce_homogeneous(&self.values, percent)?;
        Self::uniform(values, self.interval)
    }

    /// Run every quadrature rule over the series.
    pub fn integrate(&self) -> IntegrationResults {
        integrate_all(&self.times, &self.values)
    }

    /// Rank `results` against a calibration level for this series' length
    /// and interval.
    pub fn rank(&self, results: &IntegrationResults, reference_db: f64) -> Result<ErrorReport> {
        rank_methods_with_interval(results, reference_db, self.len(), self.interval)
    }

    /// Energy by rectangle summation of the values at the nominal interval.
    pub fn sample_energy(&self) -> f64 {
        rectangle_energy(&self.values, self.interval)
    }

    /// Dose of `energy_total` accumulated over this series' duration.
    pub fn dose(&self, energy_total: f64) -> Result<DoseReport> {
        laeq_and_dose(energy_total, self.duration_seconds())
    }

    /// Descriptive statistics of the values.
    pub fn statistics(&self) -> Option<SeriesStatistics> {
        describe(&self.values)
    }
}

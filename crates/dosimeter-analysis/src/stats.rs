//! Descriptive statistics of a sampled series

/// Summary of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStatistics {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation (divides by `N`).
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Median; the mean of the two middle values for even counts.
    pub median: f64,
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation, `None` for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Median, `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(0.5 * (sorted[mid - 1] + sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// Compute all statistics at once. Returns `None` for an empty slice.
pub fn describe(values: &[f64]) -> Option<SeriesStatistics> {
    let min = values.iter().copied().min_by(f64::total_cmp)?;
    let max = values.iter().copied().max_by(f64::total_cmp)?;
    Some(SeriesStatistics {
        mean: mean(values)?,
        std_dev: std_dev(values)?,
        min,
        max,
        median: median(values)?,
    })
}

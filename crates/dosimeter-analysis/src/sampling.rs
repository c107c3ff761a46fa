//! Sample-count validation, prefix truncation and homogeneous thinning
//!
//! Every series handed to the quadrature rules is cut to an *admissible*
//! length `n = 25 + 6k`. Such an `n` is odd, which Simpson 1/3 needs, and
//! `n - 1` is a multiple of 6 and therefore of 3, which Simpson 3/8 needs.
//! One truncated series is valid for all three rules at once.
//!
//! The row operations are generic over the row type so callers can thin
//! plain level vectors and whole tabular records alike.

use crate::error::{AnalysisError, Result};

/// Smallest admissible row count.
pub const MIN_ADMISSIBLE_COUNT: usize = 25;

/// Spacing between consecutive admissible row counts.
pub const ADMISSIBLE_STEP: usize = 6;

/// Largest count of the form `25 + 6k` not exceeding `n`.
///
/// Uses floor division, so for `n < 25` the result drops below 25 and can
/// even be negative (`max_admissible_count(24) == 19`,
/// `max_admissible_count(0) == -5`). Such a value means no valid truncation
/// exists; use [`admissible_count`] for the checked form.
pub fn max_admissible_count(n: usize) -> i64 {
    let min = MIN_ADMISSIBLE_COUNT as i64;
    let step = ADMISSIBLE_STEP as i64;
    min + step * (n as i64 - min).div_euclid(step)
}

/// Checked admissible count: the value of [`max_admissible_count`] when it
/// lies in `25..=n`.
///
/// # Errors
///
/// [`AnalysisError::InsufficientSamples`] when `n < 25`.
pub fn admissible_count(n: usize) -> Result<usize> {
    let m = max_admissible_count(n);
    if m < MIN_ADMISSIBLE_COUNT as i64 {
        return Err(AnalysisError::InsufficientSamples { available: n });
    }
    Ok(m as usize)
}

/// Whether `n` itself has the form `25 + 6k`.
pub fn is_admissible(n: usize) -> bool {
    n >= MIN_ADMISSIBLE_COUNT && (n - MIN_ADMISSIBLE_COUNT) % ADMISSIBLE_STEP == 0
}

/// Outcome of [`truncate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Truncation<'a, T> {
    /// The series already fits; nothing was cut and nothing should be written.
    Unchanged(&'a [T]),
    /// The retained prefix.
    Truncated(&'a [T]),
}

impl<'a, T> Truncation<'a, T> {
    /// Rows to use downstream, whether or not a cut happened.
    pub fn rows(&self) -> &'a [T] {
        match *self {
            Truncation::Unchanged(rows) | Truncation::Truncated(rows) => rows,
        }
    }

    /// True when rows were discarded.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Truncation::Truncated(_))
    }
}

/// Keep the first `m` rows.
///
/// When `m >= rows.len()` no truncation is needed and
/// [`Truncation::Unchanged`] is returned. Truncation always takes a prefix;
/// it never resamples.
pub fn truncate<T>(rows: &[T], m: usize) -> Truncation<'_, T> {
    if m >= rows.len() {
        Truncation::Unchanged(rows)
    } else {
        Truncation::Truncated(&rows[..m])
    }
}

/// Truncate `rows` to its admissible `25 + 6k` prefix.
///
/// # Errors
///
/// [`AnalysisError::InsufficientSamples`] when fewer than 25 rows are given.
pub fn truncate_to_admissible<T>(rows: &[T]) -> Result<Truncation<'_, T>> {
    let m = admissible_count(rows.len())?;
    Ok(truncate(rows, m))
}

fn check_percentage(percent: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&percent) {
        // NaN fails `contains` as well
        return Err(AnalysisError::InvalidPercentage(percent));
    }
    if percent == 100.0 {
        return Err(AnalysisError::DegenerateStride);
    }
    Ok(())
}

/// Indices picked by systematic sampling when `percent` of `n` rows are
/// removed: `floor(i * step)` for `i = 0, 1, 2, ...` while below `n`, with
/// `step = 100 / (100 - percent)`.
///
/// Since `step >= 1` the indices are strictly increasing.
///
/// # Errors
///
/// [`AnalysisError::InvalidPercentage`] outside `[0, 100]` and
/// [`AnalysisError::DegenerateStride`] for exactly 100.
pub fn thinning_indices(n: usize, percent: f64) -> Result<Vec<usize>> {
    check_percentage(percent)?;
    let step = 100.0 / (100.0 - percent);

    let mut indices = Vec::with_capacity((n as f64 / step).ceil() as usize);
    for i in 0_u64.. {
        let idx = (i as f64 * step).floor();
        if idx >= n as f64 {
            break;
        }
        indices.push(idx as usize);
    }
    Ok(indices)
}

/// Remove roughly `percent`% of the rows at evenly spaced positions, then
/// truncate the subsample to its admissible `25 + 6k` length.
///
/// `percent = 0` keeps every row but still applies the count rule.
///
/// # Errors
///
/// - [`AnalysisError::InvalidPercentage`] for `percent` outside `[0, 100]`
/// - [`AnalysisError::DegenerateStride`] for `percent == 100`
/// - [`AnalysisError::InsufficientSamples`] when fewer than 25 rows survive
pub fn reduce_homogeneous<T: Clone>(rows: &[T], percent: f64) -> Result<Vec<T>> {
    let indices = thinning_indices(rows.len(), percent)?;
    let keep = admissible_count(indices.len())?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        original = rows.len(),
        sampled = indices.len(),
        kept = keep,
        percent,
        "homogeneous reduction"
    );

    Ok(indices
        .into_iter()
        .take(keep)
        .map(|i| rows[i].clone())
        .collect())
}

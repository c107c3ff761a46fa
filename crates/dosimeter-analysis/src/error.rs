//! Error types for series validation, reduction, ranking and dosimetry.

use thiserror::Error;

/// Errors raised by the analysis routines that are fatal to the operation
/// that detected them.
///
/// Structural quadrature failures are not part of this enum: they are
/// reported per method as [`QuadratureError`](crate::QuadratureError) and
/// never abort a whole computation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Fewer rows than the smallest admissible count (25).
    #[error("{available} samples available; at least 25 are needed for a 25 + 6k series")]
    InsufficientSamples {
        /// Number of rows that were available.
        available: usize,
    },

    /// Removal percentage outside `[0, 100]` or not a number.
    #[error("removal percentage must be within [0, 100], got {0}")]
    InvalidPercentage(f64),

    /// Removing 100% of the rows leaves no stride to sample with.
    #[error("removing 100% of the rows leaves nothing to sample")]
    DegenerateStride,

    /// Times and values of a series have different lengths.
    #[error("series has {times} times but {values} values")]
    LengthMismatch {
        /// Number of time stamps.
        times: usize,
        /// Number of values.
        values: usize,
    },

    /// A series needs at least one sample.
    #[error("series is empty")]
    EmptySeries,

    /// Time stamps must be finite and strictly increasing.
    #[error("time stamps must be finite and strictly increasing (index {index})")]
    NonMonotonicTime {
        /// Index of the first offending time stamp.
        index: usize,
    },

    /// Sample interval must be positive and finite.
    #[error("sample interval must be positive and finite, got {0}")]
    InvalidInterval(f64),

    /// The rescaled reference energy is zero or not finite.
    #[error("reference energy {0} cannot be used to compute relative errors")]
    InvalidReference(f64),

    /// Measurement duration must be positive and finite.
    #[error("measurement duration must be positive and finite, got {0} s")]
    InvalidDuration(f64),

    /// Accumulated energy must be finite and non-negative.
    #[error("accumulated energy must be finite and non-negative, got {0}")]
    InvalidEnergy(f64),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

//! Dosimeter Analysis - Quadrature-validated noise dose estimation
//!
//! This crate turns a sampled sound-level series into an occupational noise
//! dose, cross-checking the accumulated energy with three quadrature rules:
//!
//! - [`sampling`] - "25 + 6k" admissible counts, truncation, homogeneous thinning
//! - [`quadrature`] - Trapezoidal, Simpson 1/3 and Simpson 3/8 rules
//! - [`ranking`] - Relative errors against a calibration level, best-method selection
//! - [`dosimetry`] - LAeq,T, Lex,8h and dose; dB/intensity conversion
//! - [`stats`] - Descriptive statistics
//! - [`series`] - Validated time-stamped series tying the above together
//!
//! Everything here is a pure computation over in-memory slices. Reading and
//! writing tables, charts and logging setup belong to the callers.
//!
//! ## Example Workflow
//!
//! ```rust
//! use dosimeter_analysis::SampleSeries;
//!
//! // 31 one-second samples at a steady 90.4 dB
//! let series = SampleSeries::from_levels_db(&[90.4; 31], 1.0).unwrap();
//!
//! let results = series.integrate();
//! let report = series.rank(&results, 90.4).unwrap();
//!
//! let best = report.best.expect("all three rules apply to 31 samples");
//! let energy = results.get(best).unwrap();
//! let dose = series.dose(energy).unwrap();
//! println!("LAeq = {:.2} dB(A), dose = {:.4}%", dose.laeq_db, dose.dose_percent);
//! ```
//!
//! ## Logging
//!
//! With the `tracing` feature enabled the routines emit `tracing` events
//! (rule results, unavailable rules, reduction sizes). Without it the crate
//! has no logging dependency.

pub mod dosimetry;
pub mod error;
pub mod quadrature;
pub mod ranking;
pub mod sampling;
pub mod series;
pub mod stats;

// Re-export main types
pub use dosimetry::{
    DoseReport, I_REF, db_to_intensity, intensity_to_db, laeq, laeq_and_dose, laeq_from_samples,
    levels_to_intensity, lex_8h, noise_dose, rectangle_energy,
};
pub use error::{AnalysisError, Result};
pub use quadrature::{
    IntegrationEntry, IntegrationResults, Method, QuadratureError, integrate_all, simpson_1_3,
    simpson_3_8, trapezoidal,
};
pub use ranking::{ErrorReport, MethodError, best_method, rank_methods, rank_methods_with_interval};
pub use sampling::{
    Truncation, admissible_count, is_admissible, max_admissible_count, reduce_homogeneous,
    thinning_indices, truncate, truncate_to_admissible,
};
pub use series::SampleSeries;
pub use stats::{SeriesStatistics, describe};

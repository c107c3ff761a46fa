//! Relative-error ranking of quadrature results against a calibration level
//!
//! The calibration reference arrives in decibels and is rescaled into the
//! energy units of the integrals before comparing:
//!
//! ```text
//! reference_energy = N * dt * I_ref * 10^(reference_db / 10)
//! ```
//!
//! i.e. the energy of `N` samples held at the reference level.

use crate::dosimetry::db_to_intensity;
use crate::error::{AnalysisError, Result};
use crate::quadrature::{IntegrationResults, Method};

/// Error of one available method against the reference energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodError {
    /// Method the error belongs to.
    pub method: Method,
    /// Integral the method produced.
    pub value: f64,
    /// `|value - reference| / |reference|`.
    pub relative: f64,
    /// `100 * relative`.
    pub percent: f64,
}

/// Errors of every available method plus the selected best method.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// Calibration level the reference was derived from, in dB.
    pub reference_db: f64,
    /// Reference rescaled into integral units.
    pub reference_energy: f64,
    /// One entry per available method, in evaluation order.
    pub errors: Vec<MethodError>,
    /// Method with the smallest relative error, if any method was available.
    pub best: Option<Method>,
}

impl ErrorReport {
    /// Error entry of `method`, `None` when it was unavailable.
    pub fn get(&self, method: Method) -> Option<&MethodError> {
        self.errors.iter().find(|e| e.method == method)
    }

    /// Error entry of the selected best method.
    pub fn best_error(&self) -> Option<&MethodError> {
        self.best.and_then(|m| self.get(m))
    }
}

/// Energy of `n` samples spaced `dt` seconds apart at `reference_db`.
pub fn reference_energy(reference_db: f64, n: usize, dt: f64) -> f64 {
    n as f64 * dt * db_to_intensity(reference_db)
}

/// Rank the available methods against `reference_db` for `n` unit-interval
/// samples.
///
/// Unavailable methods get no entry. The best method has the smallest
/// relative error; on ties the method evaluated first wins. When no method
/// is available the report's `best` is `None`.
///
/// # Errors
///
/// [`AnalysisError::InvalidReference`] when the rescaled reference is zero or
/// not finite, e.g. for `n == 0`.
pub fn rank_methods(
    results: &IntegrationResults,
    reference_db: f64,
    n: usize,
) -> Result<ErrorReport> {
    rank_methods_with_interval(results, reference_db, n, 1.0)
}

/// [`rank_methods`] for samples spaced `dt` seconds apart.
///
/// # Errors
///
/// [`AnalysisError::InvalidInterval`] for a non-positive or non-finite `dt`
/// and [`AnalysisError::InvalidReference`] as for [`rank_methods`].
pub fn rank_methods_with_interval(
    results: &IntegrationResults,
    reference_db: f64,
    n: usize,
    dt: f64,
) -> Result<ErrorReport> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(AnalysisError::InvalidInterval(dt));
    }
    let reference = reference_energy(reference_db, n, dt);
    if !reference.is_finite() || reference == 0.0 {
        return Err(AnalysisError::InvalidReference(reference));
    }

    let errors: Vec<MethodError> = results
        .available()
        .map(|(method, value)| {
            let relative = (value - reference).abs() / reference.abs();
            MethodError {
                method,
                value,
                relative,
                percent: relative * 100.0,
            }
        })
        .collect();

    let best = best_method(&errors);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        reference_db,
        reference,
        available = errors.len(),
        best = best.map(Method::label),
        "ranked integration methods"
    );

    Ok(ErrorReport {
        reference_db,
        reference_energy: reference,
        errors,
        best,
    })
}

/// Method with the smallest relative error; first seen wins ties.
///
/// Entries whose error is NaN are never selected.
pub fn best_method(errors: &[MethodError]) -> Option<Method> {
    let mut best: Option<&MethodError> = None;
    for candidate in errors.iter().filter(|e| !e.relative.is_nan()) {
        match best {
            Some(current) if candidate.relative >= current.relative => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|e| e.method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadrature::{IntegrationEntry, QuadratureError};

    fn results(values: [Option<f64>; 3]) -> IntegrationResults {
        let entries = Method::ALL
            .iter()
            .zip(values)
            .map(|(&method, value)| IntegrationEntry {
                method,
                outcome: value.ok_or(QuadratureError::EvenPointCount(30)),
            })
            .collect();
        IntegrationResults::from_entries(entries)
    }

    #[test]
    fn reference_is_rescaled_to_energy() {
        // 10 samples at 0 dB -> 10 * 1e-12
        let r = reference_energy(0.0, 10, 1.0);
        assert!((r - 1e-11).abs() < 1e-24);
        // 3 dB adds a factor of ~2
        let r3 = reference_energy(3.0, 10, 1.0);
        assert!((r3 / r - 10f64.powf(0.3)).abs() < 1e-12);
    }

    #[test]
    fn relative_and_percent_errors() {
        let reference = reference_energy(90.0, 10, 1.0);
        let report = rank_methods(
            &results([Some(reference * 1.1), Some(reference * 0.95), None]),
            90.0,
            10,
        )
        .unwrap();

        let trap = report.get(Method::Trapezoidal).unwrap();
        assert!((trap.relative - 0.1).abs() < 1e-12);
        assert!((trap.percent - 10.0).abs() < 1e-9);

        assert!(report.get(Method::Simpson38).is_none());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.best, Some(Method::Simpson13));
    }

    #[test]
    fn ties_go_to_first_evaluated() {
        let reference = reference_energy(80.0, 25, 1.0);
        let same = reference * 1.02;
        let report = rank_methods(
            &results([Some(same), Some(reference * 1.5), Some(same)]),
            80.0,
            25,
        )
        .unwrap();
        assert_eq!(report.best, Some(Method::Trapezoidal));

        // order of the slice decides, not the method itself
        let errors = [
            MethodError {
                method: Method::Simpson38,
                value: 1.0,
                relative: 0.5,
                percent: 50.0,
            },
            MethodError {
                method: Method::Trapezoidal,
                value: 1.0,
                relative: 0.5,
                percent: 50.0,
            },
        ];
        assert_eq!(best_method(&errors), Some(Method::Simpson38));
    }

    #[test]
    fn no_available_method_means_no_best() {
        let report = rank_methods(&results([None, None, None]), 85.0, 31).unwrap();
        assert!(report.errors.is_empty());
        assert_eq!(report.best, None);
        assert!(report.best_error().is_none());
    }

    #[test]
    fn nan_errors_are_never_selected() {
        let errors = [
            MethodError {
                method: Method::Trapezoidal,
                value: f64::NAN,
                relative: f64::NAN,
                percent: f64::NAN,
            },
            MethodError {
                method: Method::Simpson13,
                value: 1.0,
                relative: 0.3,
                percent: 30.0,
            },
        ];
        assert_eq!(best_method(&errors), Some(Method::Simpson13));
        assert_eq!(best_method(&errors[..1]), None);
    }

    #[test]
    fn zero_samples_is_an_invalid_reference() {
        let err = rank_methods(&results([Some(1.0), None, None]), 90.0, 0).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidReference(0.0));
    }

    #[test]
    fn interval_scales_reference() {
        let r1 = rank_methods_with_interval(&results([None, None, None]), 90.0, 31, 1.0).unwrap();
        let r2 = rank_methods_with_interval(&results([None, None, None]), 90.0, 31, 0.5).unwrap();
        assert!((r1.reference_energy - 2.0 * r2.reference_energy).abs() < 1e-15);
        assert!(rank_methods_with_interval(&results([None, None, None]), 90.0, 31, 0.0).is_err());
    }
}

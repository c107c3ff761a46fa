//! Equivalent continuous level and occupational noise dose
//!
//! - LAeq,T from an accumulated energy and the measurement duration
//! - Lex,8h normalisation to an 8-hour working day
//! - Dose against an 85 dB(A) criterion with a 3 dB exchange rate
//!
//! Levels and intensities are related through the reference intensity
//! [`I_REF`] = 1e-12 W/m², the zero of the decibel intensity scale. The same
//! constant is used when converting levels to intensities, when rescaling a
//! calibration reference, and when computing LAeq.

use crate::error::{AnalysisError, Result};

/// Reference sound intensity in W/m².
pub const I_REF: f64 = 1e-12;

/// Criterion level of the daily dose, dB(A).
pub const CRITERION_LEVEL_DB: f64 = 85.0;

/// Level increase that doubles the dose, dB.
pub const EXCHANGE_RATE_DB: f64 = 3.0;

/// Reference working day, hours.
pub const REFERENCE_DURATION_HOURS: f64 = 8.0;

/// Convert a level in dB to intensity: `I_ref * 10^(L/10)`.
pub fn db_to_intensity(level_db: f64) -> f64 {
    I_REF * 10f64.powf(level_db / 10.0)
}

/// Convert an intensity back to a level in dB.
///
/// Zero intensity maps to negative infinity.
pub fn intensity_to_db(intensity: f64) -> f64 {
    10.0 * (intensity / I_REF).log10()
}

/// Convert a whole level series to intensities.
pub fn levels_to_intensity(levels_db: &[f64]) -> Vec<f64> {
    levels_db.iter().map(|&l| db_to_intensity(l)).collect()
}

/// Equivalent continuous level and dose of one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseReport {
    /// LAeq,T in dB(A).
    pub laeq_db: f64,
    /// Daily exposure level normalised to 8 hours, dB(A).
    pub lex_8h_db: f64,
    /// Dose relative to the 85 dB(A) / 8 h criterion, percent.
    pub dose_percent: f64,
    /// Measurement duration in hours.
    pub duration_hours: f64,
}

fn check_duration(duration_seconds: f64) -> Result<()> {
    if duration_seconds.is_finite() && duration_seconds > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidDuration(duration_seconds))
    }
}

/// LAeq,T = `10 * log10((energy / T) / I_ref)`.
///
/// # Errors
///
/// Non-positive or non-finite duration, negative or non-finite energy.
pub fn laeq(energy_total: f64, duration_seconds: f64) -> Result<f64> {
    check_duration(duration_seconds)?;
    if !energy_total.is_finite() || energy_total < 0.0 {
        return Err(AnalysisError::InvalidEnergy(energy_total));
    }
    Ok(intensity_to_db(energy_total / duration_seconds))
}

/// Energy of an intensity series by rectangle summation, `sum(I) * dt`.
pub fn rectangle_energy(intensities: &[f64], dt: f64) -> f64 {
    intensities.iter().sum::<f64>() * dt
}

/// LAeq,T of an intensity series by rectangle summation, [`rectangle_energy`]
/// over `N * dt` seconds.
///
/// # Errors
///
/// Empty input (zero duration) or a non-positive interval.
pub fn laeq_from_samples(intensities: &[f64], dt: f64) -> Result<f64> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(AnalysisError::InvalidInterval(dt));
    }
    laeq(
        rectangle_energy(intensities, dt),
        intensities.len() as f64 * dt,
    )
}

/// Lex,8h = `LAeq,T + 10 * log10(T_h / 8)`.
pub fn lex_8h(laeq_db: f64, duration_hours: f64) -> f64 {
    laeq_db + 10.0 * (duration_hours / REFERENCE_DURATION_HOURS).log10()
}

/// Dose in percent: `100 * 2^((Lex,8h - 85) / 3)`.
pub fn noise_dose(lex_8h_db: f64) -> f64 {
    100.0 * 2f64.powf((lex_8h_db - CRITERION_LEVEL_DB) / EXCHANGE_RATE_DB)
}

/// LAeq,T and dose from the total energy of a measurement.
///
/// # Example
///
/// ```rust
/// use dosimeter_analysis::dosimetry::{db_to_intensity, laeq_and_dose};
///
/// // 8 hours at a steady 85 dB(A) is exactly the criterion dose
/// let seconds = 8.0 * 3600.0;
/// let report = laeq_and_dose(db_to_intensity(85.0) * seconds, seconds).unwrap();
/// assert!((report.laeq_db - 85.0).abs() < 1e-9);
/// assert!((report.dose_percent - 100.0).abs() < 1e-6);
/// ```
///
/// # Errors
///
/// See [`laeq`].
pub fn laeq_and_dose(energy_total: f64, duration_seconds: f64) -> Result<DoseReport> {
    let laeq_db = laeq(energy_total, duration_seconds)?;
    let duration_hours = duration_seconds / 3600.0;
    let lex = lex_8h(laeq_db, duration_hours);
    let dose_percent = noise_dose(lex);

    #[cfg(feature = "tracing")]
    tracing::info!(laeq_db, dose_percent, duration_hours, "noise dose");

    Ok(DoseReport {
        laeq_db,
        lex_8h_db: lex,
        dose_percent,
        duration_hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_intensity_round_trip() {
        for level in [0.0, 40.0, 85.0, 90.4, 120.0] {
            let back = intensity_to_db(db_to_intensity(level));
            assert!((back - level).abs() < 1e-9, "{level} -> {back}");
        }
        assert_eq!(db_to_intensity(0.0), I_REF);
    }

    #[test]
    fn reference_intensity_is_zero_db() {
        let n = 31;
        let intensities = vec![I_REF; n];
        let energy: f64 = intensities.iter().sum();
        let level = laeq(energy, n as f64).unwrap();
        assert!(level.abs() < 1e-9, "got {level}");
        assert!(laeq_from_samples(&intensities, 1.0).unwrap().abs() < 1e-9);
    }

    #[test]
    fn rectangle_energy_sums_samples() {
        assert_eq!(rectangle_energy(&[1.0, 2.0, 3.0], 0.5), 3.0);
        assert_eq!(rectangle_energy(&[], 1.0), 0.0);
    }

    #[test]
    fn criterion_dose_is_one_hundred_percent() {
        let seconds = 8.0 * 3600.0;
        let report = laeq_and_dose(db_to_intensity(85.0) * seconds, seconds).unwrap();
        assert!((report.lex_8h_db - 85.0).abs() < 1e-9);
        assert!((report.dose_percent - 100.0).abs() < 1e-6);
        assert!((report.duration_hours - 8.0).abs() < 1e-12);
    }

    #[test]
    fn exchange_rate_doubles_dose() {
        assert!((noise_dose(88.0) - 200.0).abs() < 1e-9);
        assert!((noise_dose(82.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn half_shift_at_plus_three_db() {
        // 4 h at 88 dB(A) ~ 8 h at 85 dB(A)
        let seconds = 4.0 * 3600.0;
        let report = laeq_and_dose(db_to_intensity(88.0) * seconds, seconds).unwrap();
        assert!((report.dose_percent - 100.0).abs() < 0.5, "{report:?}");
    }

    #[test]
    fn rejects_bad_duration_and_energy() {
        assert_eq!(
            laeq_and_dose(1.0, 0.0),
            Err(AnalysisError::InvalidDuration(0.0))
        );
        assert!(matches!(
            laeq_and_dose(1.0, f64::NAN),
            Err(AnalysisError::InvalidDuration(_))
        ));
        assert_eq!(
            laeq_and_dose(-1.0, 10.0),
            Err(AnalysisError::InvalidEnergy(-1.0))
        );
        assert!(laeq_from_samples(&[], 1.0).is_err());
    }

    #[test]
    fn silence_is_negative_infinity() {
        let level = laeq(0.0, 10.0).unwrap();
        assert!(level.is_infinite() && level < 0.0);
    }
}

//! Integration tests for dosimeter-analysis.
//!
//! Exercises the full chain: level series -> truncation/reduction ->
//! intensity -> quadrature -> ranking -> dose.

use dosimeter_analysis::{
    I_REF, Method, SampleSeries, db_to_intensity, integrate_all, laeq_and_dose,
    max_admissible_count, rank_methods, reduce_homogeneous, simpson_1_3, simpson_3_8,
    trapezoidal, truncate,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Unit-interval time axis `1..=n`, as the measurement files are numbered.
fn time_axis(n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64).collect()
}

/// Dose evaluated by hand from a level, a duration and the 85 dB / 3 dB rule.
fn hand_dose(laeq_db: f64, seconds: f64) -> f64 {
    let lex = laeq_db + 10.0 * (seconds / 3600.0 / 8.0).log10();
    100.0 * 2f64.powf((lex - 85.0) / 3.0)
}

// ===========================================================================
// 1. Constant 90.4 dB scenario
// ===========================================================================

#[test]
fn constant_level_end_to_end() {
    let level = 90.4;
    let n = 31;
    let x = time_axis(n);
    let y = vec![db_to_intensity(level); n];

    let results = integrate_all(&x, &y);
    assert_eq!(results.available().count(), 3, "31 samples suit every rule");

    let values: Vec<f64> = results.available().map(|(_, v)| v).collect();
    for v in &values {
        assert!(
            ((v - values[0]) / values[0]).abs() < 1e-12,
            "rules disagree: {values:?}"
        );
    }

    let report = rank_methods(&results, level, n).unwrap();
    assert_eq!(report.errors.len(), 3);
    for e in &report.errors {
        // 30 intervals integrated against 31 samples of reference energy
        assert!((e.relative - 1.0 / 31.0).abs() < 1e-9, "{e:?}");
        assert!((e.percent - 100.0 / 31.0).abs() < 1e-7, "{e:?}");
    }

    let best = report.best.expect("a best method exists");
    let energy = results.get(best).unwrap();
    let dose = laeq_and_dose(energy, n as f64).unwrap();

    let expected_laeq = 10.0 * ((energy / n as f64) / I_REF).log10();
    assert!((dose.laeq_db - expected_laeq).abs() < 1e-9);
    assert!((dose.laeq_db - (level + 10.0 * (30.0_f64 / 31.0).log10())).abs() < 1e-9);
    assert!((dose.dose_percent - hand_dose(expected_laeq, n as f64)).abs() < 1e-9);
    assert!((dose.duration_hours - 31.0 / 3600.0).abs() < 1e-15);
}

#[test]
fn series_api_matches_free_functions() {
    let levels: Vec<f64> = (0..37).map(|i| 80.0 + (i % 5) as f64).collect();
    let series = SampleSeries::from_levels_db(&levels, 1.0).unwrap();

    let via_series = series.integrate();
    let via_functions = integrate_all(&time_axis(37), series.values());
    assert_eq!(via_series, via_functions);

    let a = series.rank(&via_series, 82.0).unwrap();
    let b = rank_methods(&via_functions, 82.0, 37).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// 2. Truncation and reduction feed all three rules
// ===========================================================================

#[test]
fn truncated_length_satisfies_every_rule() {
    for raw in 25..200 {
        let m = max_admissible_count(raw) as usize;
        let rows: Vec<f64> = (0..raw).map(|i| i as f64).collect();
        let kept = truncate(&rows, m).rows();
        assert_eq!(kept.len(), m);

        let x = time_axis(m);
        assert!(trapezoidal(&x, kept).is_ok());
        assert!(simpson_1_3(&x, kept).is_ok(), "Simpson 1/3 failed for {m}");
        assert!(simpson_3_8(&x, kept).is_ok(), "Simpson 3/8 failed for {m}");
    }
}

#[test]
fn reduced_series_integrates_with_every_rule() {
    let levels: Vec<f64> = (0..120).map(|i| 75.0 + (i as f64 * 0.1).sin() * 5.0).collect();
    let reduced = reduce_homogeneous(&levels, 20.0).unwrap();
    let series = SampleSeries::from_levels_db(&reduced, 1.0).unwrap();

    let results = series.integrate();
    for method in Method::ALL {
        assert!(results.get(method).is_some(), "{method} unavailable");
    }
}

#[test]
fn smooth_signal_rules_converge() {
    // a smooth intensity curve: Simpson rules should agree closely with each
    // other and the trapezoid should be close behind
    let n = 301;
    let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.01).collect();
    let y: Vec<f64> = x.iter().map(|t| (1.0 + t).exp()).collect();
    let exact = (1.0f64 + 3.0).exp() - 1.0f64.exp();

    let results = integrate_all(&x, &y);
    let s13 = results.get(Method::Simpson13).unwrap();
    let s38 = results.get(Method::Simpson38).unwrap();
    let trap = results.get(Method::Trapezoidal).unwrap();

    assert!((s13 - exact).abs() / exact < 1e-9);
    assert!((s38 - exact).abs() / exact < 1e-9);
    assert!((trap - exact).abs() / exact < 1e-4);
}

//! Dose demo: quadrature comparison and noise dose of a synthetic shift.
//!
//! Run with: cargo run -p dosimeter-analysis --example dose_demo

use dosimeter_analysis::{Method, SampleSeries, reduce_homogeneous, truncate_to_admissible};

fn main() {
    // --- One hour of 1 s samples around 87 dB(A) ---
    println!("=== Synthetic Measurement ===\n");

    let levels: Vec<f64> = (0..3600)
        .map(|i| 87.0 + 4.0 * (i as f64 / 300.0).sin())
        .collect();

    let Ok(cut) = truncate_to_admissible(&levels) else {
        eprintln!("not enough samples");
        return;
    };
    println!(
        "Samples: {} -> {} (25 + 6k)",
        levels.len(),
        cut.rows().len()
    );

    for (label, rows) in [
        ("complete", cut.rows().to_vec()),
        ("reduced 80%", reduce_homogeneous(&levels, 20.0).unwrap_or_default()),
    ] {
        println!("\n=== {label} ({} samples) ===\n", rows.len());
        let series = match SampleSeries::from_levels_db(&rows, 1.0) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        let results = series.integrate();
        let report = match series.rank(&results, 90.4) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        println!("{:<14} {:>16} {:>12}", "Method", "Integral", "Error %");
        for method in Method::ALL {
            match report.get(method) {
                Some(e) => println!("{:<14} {:>16.6e} {:>12.4}", method.label(), e.value, e.percent),
                None => println!("{:<14} {:>16} {:>12}", method.label(), "N/A", "N/A"),
            }
        }

        let Some(best) = report.best else {
            println!("No method available");
            continue;
        };
        let Some(energy) = results.get(best) else {
            continue;
        };
        if let Ok(dose) = series.dose(energy) {
            println!("\nBest method: {best}");
            println!("LAeq,T  = {:.2} dB(A)", dose.laeq_db);
            println!("Lex,8h  = {:.2} dB(A)", dose.lex_8h_db);
            println!("Dose    = {:.2} %", dose.dose_percent);
        }
    }
}

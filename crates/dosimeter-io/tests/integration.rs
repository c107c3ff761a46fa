//! Integration tests for dosimeter-io: a measurement CSV through truncation,
//! reduction, exports and charts.

use dosimeter_analysis::{Method, SampleSeries};
use dosimeter_io::{
    CsvTable, Error, RunSummary, geojson_to_csv, read_csv, write_charts, write_csv,
    write_dose_csv, write_intensity_csv, write_results_csv, write_statistics_csv,
    write_summary_json,
};
use std::path::Path;

/// Measurement file with an id column and `n` level samples.
fn write_measurement(path: &Path, n: usize) {
    let mut text = String::from("id,leq_mean,comment\n");
    for i in 0..n {
        text.push_str(&format!("{i},{},\"ok, stable\"\n", 88.0 + (i % 4) as f64 * 0.8));
    }
    std::fs::write(path, text).unwrap();
}

// ============================================================================
// Truncation and reduction of whole tables
// ============================================================================

#[test]
fn truncated_table_keeps_columns_and_quoting() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("datos.csv");
    write_measurement(&input, 40);

    let table = read_csv(&input).unwrap();
    let (cut, truncated) = table.truncated_to_admissible().unwrap();
    assert!(truncated);
    assert_eq!(cut.len(), 37);

    let out = dir.path().join("truncado_25_6k.csv");
    write_csv(&out, &cut).unwrap();
    let back = read_csv(&out).unwrap();
    assert_eq!(back, cut);
    assert_eq!(back.rows()[0][2], "ok, stable");
}

#[test]
fn reduced_table_has_admissible_length() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("datos.csv");
    write_measurement(&input, 200);

    let table = read_csv(&input).unwrap();
    let reduced = table.reduced(20.0).unwrap();
    assert!(reduced.len() >= 25);
    assert_eq!((reduced.len() - 25) % 6, 0);
    assert_eq!(reduced.headers(), table.headers());
}

#[test]
fn short_table_cannot_be_truncated() {
    let table = CsvTable::parse("leq_mean\n80\n81\n").unwrap();
    assert!(matches!(
        table.truncated_to_admissible(),
        Err(Error::Analysis(_))
    ));
}

// ============================================================================
// Full export of one pass
// ============================================================================

#[test]
fn full_pass_exports() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("datos.csv");
    write_measurement(&input, 31);

    let table = read_csv(&input).unwrap();
    let levels = table.column_f64("leq_mean").unwrap();
    let series = SampleSeries::from_levels_db(&levels, 1.0).unwrap();
    let results = series.integrate();
    let report = series.rank(&results, 90.4).unwrap();
    let best = report.best.unwrap();
    let dose = series.dose(results.get(best).unwrap()).unwrap();

    let out = dir.path().join("resultados");
    std::fs::create_dir_all(&out).unwrap();
    write_intensity_csv(out.join("intensidad_completa.csv"), &series).unwrap();
    write_results_csv(out.join("resultados_completos.csv"), &results, Some(&report)).unwrap();
    write_statistics_csv(
        out.join("estadisticos_completos.csv"),
        &series.statistics().unwrap(),
    )
    .unwrap();
    write_dose_csv(out.join("laeq_dosis_completo.csv"), &dose).unwrap();
    let summary = RunSummary::new("completo", &series, &results, &report, Some(&dose));
    write_summary_json(out.join("resumen.json"), &[summary]).unwrap();
    let charts = write_charts(dir.path().join("IMG"), "completo", &series, &results).unwrap();

    let resultados = read_csv(out.join("resultados_completos.csv")).unwrap();
    let methods = resultados.column("metodo").unwrap();
    assert_eq!(
        methods,
        Method::ALL.iter().map(|m| m.label()).collect::<Vec<_>>()
    );
    // all three rules apply to 31 samples
    assert!(resultados.column_f64("integral").is_ok());

    let dosis = read_csv(out.join("laeq_dosis_completo.csv")).unwrap();
    assert_eq!(dosis.column_f64("dosis_%").unwrap(), vec![dose.dose_percent]);

    let svg = std::fs::read_to_string(&charts.comparison).unwrap();
    assert!(!svg.contains("N/A"));
}

#[test]
fn missing_level_column_is_reported() {
    let table = CsvTable::parse("id,level\n1,80\n").unwrap();
    let err = table.column_f64("leq_mean").unwrap_err();
    assert_eq!(err.to_string(), "Column 'leq_mean' not found");
}

// ============================================================================
// GeoJSON
// ============================================================================

#[test]
fn geojson_track_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("track.geojson");
    let output = dir.path().join("datos.csv");
    std::fs::write(
        &input,
        r#"{
          "type": "FeatureCollection",
          "features": [
            {"type": "Feature",
             "properties": {"leq_mean": 80.5, "time": "10:00:01"},
             "geometry": {"type": "Point", "coordinates": [-74.08, 4.6]}},
            {"type": "Feature",
             "properties": {"leq_mean": 81.0, "time": "10:00:02", "note": "a, b"},
             "geometry": {"type": "Point", "coordinates": [-74.081, 4.601]}}
          ]
        }"#,
    )
    .unwrap();

    assert_eq!(geojson_to_csv(&input, &output).unwrap(), 2);

    let table = read_csv(&output).unwrap();
    assert_eq!(table.headers(), &["leq_mean", "note", "time", "geometry_wkt"]);
    assert_eq!(table.column_f64("leq_mean").unwrap(), vec![80.5, 81.0]);
    assert_eq!(table.rows()[0][3], "POINT (-74.08 4.6)");
    assert_eq!(table.rows()[1][1], "a, b");
}

#[test]
fn geojson_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.geojson");
    assert!(matches!(
        geojson_to_csv(&missing, dir.path().join("out.csv")),
        Err(Error::Io(_))
    ));

    let broken = dir.path().join("broken.geojson");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        geojson_to_csv(&broken, dir.path().join("out.csv")),
        Err(Error::Json(_))
    ));

    let no_features = dir.path().join("nofeatures.geojson");
    std::fs::write(&no_features, r#"{"type": "FeatureCollection"}"#).unwrap();
    assert!(matches!(
        geojson_to_csv(&no_features, dir.path().join("out.csv")),
        Err(Error::InvalidGeoJson(_))
    ));
}

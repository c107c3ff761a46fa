//! SVG charts of a pipeline pass.
//!
//! Two charts per pass, rendered with `plotters` into SVG:
//!
//! - `{prefix}_serie.svg`: the intensity series as a shaded line, with the
//!   mean and one standard deviation either side drawn as guides
//! - `{prefix}_comparacion.svg`: one bar per integration method; methods
//!   that could not run get an "N/A" label instead of a bar

use crate::{Error, Result};
use dosimeter_analysis::{IntegrationResults, SampleSeries, describe};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::{Path, PathBuf};

const SIZE: (u32, u32) = (800, 420);

const TEAL: RGBColor = RGBColor(0, 128, 128);
const CRIMSON: RGBColor = RGBColor(220, 20, 60);
const GRAY: RGBColor = RGBColor(128, 128, 128);
const BAR_COLORS: [RGBColor; 3] = [
    RGBColor(255, 165, 0),
    RGBColor(0, 128, 0),
    RGBColor(220, 0, 0),
];

type DrawResult<T> = std::result::Result<T, DrawingAreaErrorKind<std::io::Error>>;

/// Files written by [`write_charts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPaths {
    /// Time-series chart.
    pub series: PathBuf,
    /// Method-comparison chart.
    pub comparison: PathBuf,
}

/// Write both charts for one pass into `dir`, creating it when missing.
pub fn write_charts(
    dir: impl AsRef<Path>,
    prefix: &str,
    series: &SampleSeries,
    results: &IntegrationResults,
) -> Result<ChartPaths> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let paths = ChartPaths {
        series: dir.join(format!("{prefix}_serie.svg")),
        comparison: dir.join(format!("{prefix}_comparacion.svg")),
    };

    std::fs::write(
        &paths.series,
        series_chart_svg(series.times(), series.values())?,
    )?;
    tracing::info!(path = %paths.series.display(), "saved series chart");

    std::fs::write(&paths.comparison, comparison_chart_svg(results)?)?;
    tracing::info!(path = %paths.comparison.display(), "saved comparison chart");

    Ok(paths)
}

/// Widen an empty or inverted range so flat data still gets a visible band.
fn padded(lo: f64, hi: f64) -> Range<f64> {
    if hi > lo {
        lo..hi
    } else {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
        (lo - pad)..(hi + pad)
    }
}

fn format_tick(v: f64) -> String {
    if v != 0.0 && (v.abs() < 1e-2 || v.abs() >= 1e5) {
        format!("{v:.2e}")
    } else {
        format!("{v:.2}")
    }
}

fn chart_error(e: DrawingAreaErrorKind<std::io::Error>) -> Error {
    Error::Chart(e.to_string())
}

/// Render the time-series chart.
pub fn series_chart_svg(x: &[f64], y: &[f64]) -> Result<String> {
    let n = x.len().min(y.len());
    let mut svg = String::new();
    render_series(&mut svg, &x[..n], &y[..n]).map_err(chart_error)?;
    Ok(svg)
}

fn render_series(svg: &mut String, x: &[f64], y: &[f64]) -> DrawResult<()> {
    let root = SVGBackend::with_string(svg, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let stats = describe(y);
    let x_range = padded(
        x.first().copied().unwrap_or(0.0),
        x.last().copied().unwrap_or(1.0),
    );
    let y_range = match stats {
        Some(s) => padded(
            s.min.min(0.0).min(s.mean - s.std_dev),
            s.max.max(s.mean + s.std_dev),
        ),
        None => 0.0..1.0,
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Serie temporal de los datos observados",
            ("sans-serif", 18),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc("Tiempo (s)")
        .y_desc("Intensidad")
        .y_label_formatter(&|v| format_tick(*v))
        .draw()?;

    let Some(stats) = stats else {
        root.present()?;
        return Ok(());
    };

    let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    let baseline = 0.0_f64.clamp(y_range.start, y_range.end);

    chart.draw_series(AreaSeries::new(
        points.clone(),
        baseline,
        TEAL.mix(0.2).filled(),
    ))?;
    chart
        .draw_series(LineSeries::new(points, TEAL.stroke_width(2)))?
        .label("Datos observados")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TEAL.stroke_width(2)));

    let upper = stats.mean + stats.std_dev;
    let lower = stats.mean - stats.std_dev;
    let guides = [
        (stats.mean, CRIMSON, format!("Media: {}", format_tick(stats.mean))),
        (upper, GRAY, format!("+1 desv. estándar: {}", format_tick(upper))),
        (lower, GRAY, format!("-1 desv. estándar: {}", format_tick(lower))),
    ];
    for (value, color, label) in guides {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x_range.start, value), (x_range.end, value)],
                color,
            )))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render the method-comparison bar chart.
pub fn comparison_chart_svg(results: &IntegrationResults) -> Result<String> {
    let mut svg = String::new();
    render_comparison(&mut svg, results).map_err(chart_error)?;
    Ok(svg)
}

fn render_comparison(svg: &mut String, results: &IntegrationResults) -> DrawResult<()> {
    let root = SVGBackend::with_string(svg, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<&str> = results.iter().map(|e| e.method.label()).collect();
    let count = labels.len().max(1) as u32;

    let values: Vec<f64> = results.available().map(|(_, v)| v).collect();
    let lo = values.iter().copied().fold(0.0_f64, f64::min);
    let hi = values.iter().copied().fold(0.0_f64, f64::max);
    let y_range = padded(lo, hi * 1.1);
    let base = 0.0_f64.clamp(y_range.start, y_range.end);

    let mut chart = ChartBuilder::on(&root)
        .caption("Comparación de métodos de integración", ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d((0..count).into_segmented(), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Método")
        .y_desc("Valor de la integral")
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|l| (*l).to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v| format_tick(*v))
        .draw()?;

    let above = TextStyle::from(("sans-serif", 13).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));

    for (i, entry) in results.iter().enumerate() {
        let slot = i as u32;
        match entry.value() {
            Some(value) => {
                let color = BAR_COLORS[i % BAR_COLORS.len()];
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(slot), base),
                        (SegmentValue::Exact(slot + 1), value),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 30, 30);
                chart.draw_series(std::iter::once(bar))?;
                chart.draw_series(std::iter::once(Text::new(
                    format_tick(value),
                    (SegmentValue::CenterOf(slot), value),
                    above.clone(),
                )))?;
            }
            None => {
                chart.draw_series(std::iter::once(Text::new(
                    "N/A",
                    (SegmentValue::CenterOf(slot), base),
                    above.color(&GRAY),
                )))?;
            }
        }
    }

    root.present()?;
    Ok(())
}

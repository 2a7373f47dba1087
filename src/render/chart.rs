//! Hourly line charts drawn with the `plotters` SVG backend

use std::error::Error;

use chrono::{Duration, NaiveDateTime};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use tracing::warn;

use super::LineChart;

const SIZE: (u32, u32) = (720, 220);

/// Render `chart` as an `<svg>` document, or `None` if drawing failed.
///
/// Each run of consecutive present values becomes its own line series, so a
/// `None` leaves a visible gap.
#[must_use]
pub fn render_svg(chart: &LineChart) -> Option<String> {
    let mut svg = String::new();
    match draw(chart, &mut svg) {
        Ok(()) => Some(svg),
        Err(e) => {
            warn!("Failed to draw chart for '{}': {}", chart.variable, e);
            None
        }
    }
}

fn draw(chart: &LineChart, out: &mut String) -> Result<(), Box<dyn Error>> {
    let (start, end) = time_range(chart).ok_or("chart has no timestamps")?;
    let (lo, hi) = padded_range(chart.value_range());

    let mut caption = axis_label(chart);
    if chart.value_range().is_none() {
        caption.push_str(" (no values)");
    }

    let root = SVGBackend::with_string(out, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut plot = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 16))
        .margin(8)
        .x_label_area_size(40)
        .y_label_area_size(52)
        .build_cartesian_2d(RangedDateTime::from(start..end), lo..hi)?;

    plot.configure_mesh()
        .x_desc("Time")
        .y_desc(axis_label(chart))
        .x_labels(6)
        .x_label_formatter(&|t: &NaiveDateTime| t.format("%m-%d %H:%M").to_string())
        .light_line_style(BLACK.mix(0.1))
        .draw()?;

    for run in segments(chart) {
        plot.draw_series(LineSeries::new(run, BLUE.stroke_width(2)).point_size(2))?;
    }

    root.present()?;
    Ok(())
}

/// Variable name with its unit, e.g. `temperature_2m (°C)`
fn axis_label(chart: &LineChart) -> String {
    match &chart.unit {
        Some(unit) => format!("{} ({unit})", chart.variable),
        None => chart.variable.clone(),
    }
}

/// First and last timestamp; a single timestamp is widened to one hour
fn time_range(chart: &LineChart) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = chart.points.first()?.0;
    let end = chart.points.last()?.0;
    if end > start {
        Some((start, end))
    } else {
        Some((start, start + Duration::hours(1)))
    }
}

/// Value range with 10% headroom; flat or empty series get a fixed band
fn padded_range(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        None => (0.0, 1.0),
        Some((lo, hi)) if (hi - lo).abs() < 1e-6 => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.1;
            (lo - pad, hi + pad)
        }
    }
}

/// Runs of consecutive present values
fn segments(chart: &LineChart) -> Vec<Vec<(NaiveDateTime, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (time, value) in &chart.points {
        match value {
            Some(v) => current.push((*time, *v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

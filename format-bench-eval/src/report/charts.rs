//! SVG renditions of the two report charts, written next to the notebook.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use format_bench_core::Measurement;
use plotters::prelude::*;

pub const LATENCY_CHART: &str = "query_latency.svg";
pub const SIZE_CHART: &str = "size_vs_write.svg";

/// Per-query latencies, one series per query, each holding one value per format.
pub fn latency_series(measurements: &[Measurement]) -> Vec<(String, Vec<f64>)> {
  let Some(first) = measurements.first() else {
    return Vec::new();
  };
  first
    .query_names()
    .into_iter()
    .map(|name| {
      let values = measurements
        .iter()
        .map(|m| m.query_seconds(name).unwrap_or_default())
        .collect();
      (name.to_string(), values)
    })
    .collect()
}

/// Upper bound of a value axis; never zero so the axis range stays valid.
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
  let max = values.fold(0.0, f64::max);
  if max > 0.0 {
    max * 1.15
  } else {
    1e-3
  }
}

fn format_labels(measurements: &[Measurement]) -> Vec<&'static str> {
  measurements.iter().map(|m| m.format.label()).collect()
}

fn label_at(labels: &[&str], x: f64) -> String {
  let idx = x.round();
  if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < labels.len() {
    labels[idx as usize].to_string()
  } else {
    String::new()
  }
}

/// Grouped bars: one group per format, one bar per query.
pub fn render_query_latency(measurements: &[Measurement], path: &Path) -> Result<()> {
  ensure!(!measurements.is_empty(), "no measurements to chart");
  let series = latency_series(measurements);
  let labels = format_labels(measurements);
  let groups = measurements.len() as f64;
  let max = axis_max(series.iter().flat_map(|(_, values)| values.iter().copied()));

  let root = SVGBackend::new(path, (1000, 500)).into_drawing_area();
  root.fill(&WHITE)?;
  let mut chart = ChartBuilder::on(&root)
    .caption("Query latency per format", ("sans-serif", 24))
    .margin(15)
    .x_label_area_size(40)
    .y_label_area_size(70)
    .build_cartesian_2d(-0.5f64..groups - 0.5, 0f64..max)?;

  let formatter = |x: &f64| label_at(&labels, *x);
  chart
    .configure_mesh()
    .disable_x_mesh()
    .x_labels(measurements.len())
    .x_label_formatter(&formatter)
    .y_desc("Time (s)")
    .draw()?;

  let width = 0.8 / series.len().max(1) as f64;
  for (q, (name, values)) in series.iter().enumerate() {
    let color = Palette99::pick(q);
    chart
      .draw_series(values.iter().enumerate().map(|(i, value)| {
        let x0 = i as f64 - 0.4 + q as f64 * width;
        Rectangle::new([(x0, 0.0), (x0 + width, *value)], color.filled())
      }))?
      .label(name.as_str())
      .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], Palette99::pick(q).filled()));
  }

  chart
    .configure_series_labels()
    .background_style(WHITE.mix(0.8))
    .border_style(BLACK)
    .draw()?;
  root.present()?;
  Ok(())
}

/// Bars of on-disk size with write time as a line on a secondary axis.
pub fn render_size_vs_write(measurements: &[Measurement], path: &Path) -> Result<()> {
  ensure!(!measurements.is_empty(), "no measurements to chart");
  let labels = format_labels(measurements);
  let groups = measurements.len() as f64;
  let max_size = axis_max(measurements.iter().map(Measurement::size_megabytes));
  let max_write = axis_max(measurements.iter().map(Measurement::write_seconds));

  let root = SVGBackend::new(path, (800, 400)).into_drawing_area();
  root.fill(&WHITE)?;
  let mut chart = ChartBuilder::on(&root)
    .caption("Size and write time", ("sans-serif", 22))
    .margin(15)
    .x_label_area_size(40)
    .y_label_area_size(70)
    .right_y_label_area_size(70)
    .build_cartesian_2d(-0.5f64..groups - 0.5, 0f64..max_size)?
    .set_secondary_coord(-0.5f64..groups - 0.5, 0f64..max_write);

  let formatter = |x: &f64| label_at(&labels, *x);
  chart
    .configure_mesh()
    .disable_x_mesh()
    .x_labels(measurements.len())
    .x_label_formatter(&formatter)
    .y_desc("MB")
    .draw()?;
  chart.configure_secondary_axes().y_desc("Write (s)").draw()?;

  chart
    .draw_series(measurements.iter().enumerate().map(|(i, m)| {
      Rectangle::new(
        [(i as f64 - 0.3, 0.0), (i as f64 + 0.3, m.size_megabytes())],
        RGBColor(128, 128, 128).mix(0.6).filled(),
      )
    }))?
    .label("Size (MB)")
    .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], RGBColor(128, 128, 128).filled()));

  let points: Vec<(f64, f64)> = measurements
    .iter()
    .enumerate()
    .map(|(i, m)| (i as f64, m.write_seconds()))
    .collect();
  chart
    .draw_secondary_series(LineSeries::new(points.clone(), RED.stroke_width(2)))?
    .label("Write (s)")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], RED));
  chart.draw_secondary_series(points.into_iter().map(|p| Circle::new(p, 4, RED.filled())))?;

  chart
    .configure_series_labels()
    .background_style(WHITE.mix(0.8))
    .border_style(BLACK)
    .draw()?;
  root.present()?;
  Ok(())
}

/// Render both charts into `dir`, returning the written paths.
pub fn render_all(measurements: &[Measurement], dir: &Path) -> Result<Vec<PathBuf>> {
  std::fs::create_dir_all(dir)?;
  let latency = dir.join(LATENCY_CHART);
  let size = dir.join(SIZE_CHART);
  render_query_latency(measurements, &latency)?;
  render_size_vs_write(measurements, &size)?;
  Ok(vec![latency, size])
}

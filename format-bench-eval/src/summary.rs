//! Summary table printed once every format has been measured.

use std::sync::Arc;

use anyhow::{ensure, Result};
use arrow::{
  array::{ArrayRef, Float64Array, RecordBatch, StringArray},
  datatypes::{DataType, Field, Schema},
  util::pretty::pretty_format_batches,
};
use format_bench_core::{measurement::round_to, Measurement};

/// One row per format: label, write seconds, size in MB, then one column per query.
pub fn summary_batch(measurements: &[Measurement]) -> Result<RecordBatch> {
  let query_names: Vec<String> = measurements
    .first()
    .map(|m| m.query_names().into_iter().map(str::to_string).collect())
    .unwrap_or_default();
  for measurement in measurements {
    ensure!(
      measurement.query_names() == query_names,
      "{} was measured with a different query set",
      measurement.format
    );
  }

  let mut fields = vec![
    Field::new("format", DataType::Utf8, false),
    Field::new("write_s", DataType::Float64, false),
    Field::new("size_mb", DataType::Float64, false),
  ];
  let mut columns: Vec<ArrayRef> = vec![
    Arc::new(StringArray::from_iter_values(
      measurements.iter().map(|m| m.format.label()),
    )),
    Arc::new(Float64Array::from_iter_values(
      measurements.iter().map(|m| round_to(m.write_seconds(), 3)),
    )),
    Arc::new(Float64Array::from_iter_values(
      measurements.iter().map(|m| round_to(m.size_megabytes(), 1)),
    )),
  ];
  for (idx, name) in query_names.iter().enumerate() {
    fields.push(Field::new(format!("{name}_s"), DataType::Float64, false));
    columns.push(Arc::new(Float64Array::from_iter_values(
      measurements
        .iter()
        .map(|m| round_to(m.query_timings[idx].seconds(), 3)),
    )));
  }

  Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

pub fn format_summary(measurements: &[Measurement]) -> Result<String> {
  let batch = summary_batch(measurements)?;
  Ok(pretty_format_batches(&[batch])?.to_string())
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use format_bench_core::{Format, QueryTiming};

  use super::*;

  fn measurement(format: Format, names: &[&str]) -> Measurement {
    Measurement {
      format,
      write_duration: Duration::from_millis(1234),
      size_bytes: 5 * 1024 * 1024,
      query_timings: names
        .iter()
        .map(|name| QueryTiming {
          name: name.to_string(),
          duration: Duration::from_millis(7),
        })
        .collect(),
    }
  }

  #[test]
  fn test_summary_columns() {
    let rows = vec![
      measurement(Format::Parquet, &["q1", "q2"]),
      measurement(Format::Csv, &["q1", "q2"]),
    ];
    let batch = summary_batch(&rows).unwrap();
    assert_eq!(batch.num_rows(), 2);
    let names: Vec<_> = batch.schema().fields().iter().map(|f| f.name().clone()).collect();
    assert_eq!(names, vec!["format", "write_s", "size_mb", "q1_s", "q2_s"]);

    let text = format_summary(&rows).unwrap();
    assert!(text.contains("PARQUET"));
    assert!(text.contains("1.234"));
    assert!(text.contains("5.0"));
  }

  #[test]
  fn test_mismatched_query_sets_rejected() {
    let rows = vec![
      measurement(Format::Parquet, &["q1"]),
      measurement(Format::Csv, &["q2"]),
    ];
    assert!(summary_batch(&rows).is_err());
  }
}

//! The measurement loop: for every format, write the table, then time the query
//! battery against what was written.

use anyhow::Result;
use format_bench_core::{BenchConfig, BenchInput, Format, Measurement, QuerySet};
use log::info;

use crate::{
  dataset::{ensure_dataset, load_dataset, load_first_partition, DatasetStatus},
  layout::OutputLayout,
  runner::run_queries,
  table::SalesTable,
  writer::write,
};

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct BenchRun {
  pub dataset: DatasetStatus,
  /// Number of rows each format was measured on.
  pub rows_measured: usize,
  /// One entry per format, in [`Format::ALL`] order.
  pub measurements: Vec<Measurement>,
}

/// Write `table` as `format` and time `queries` against the artifact.
pub fn measure_format(
  table: &SalesTable,
  format: Format,
  layout: &OutputLayout,
  queries: &QuerySet,
) -> Result<Measurement> {
  let outcome = write(table, format, layout)?;
  let query_timings = run_queries(format, layout, queries)?;
  Ok(Measurement {
    format,
    write_duration: outcome.duration,
    size_bytes: outcome.size_bytes,
    query_timings,
  })
}

/// Measure every format on `table`. The first failure aborts the whole run.
pub fn measure_all(
  table: &SalesTable,
  layout: &OutputLayout,
  queries: &QuerySet,
) -> Result<Vec<Measurement>> {
  Format::ALL
    .into_iter()
    .map(|format| {
      info!("measuring {}", format.label());
      measure_format(table, format, layout, queries)
    })
    .collect()
}

/// Provide the dataset, load the configured input and measure every format.
pub async fn run_benchmark(config: &BenchConfig, layout: &OutputLayout) -> Result<BenchRun> {
  config.validate()?;
  let dataset_dir = layout.dataset_dir();
  let dataset = ensure_dataset(
    &dataset_dir,
    config.total_rows,
    config.chunk_size,
    config.seed,
  )?;

  let table = match config.input {
    BenchInput::FullDataset => load_dataset(&dataset_dir).await?,
    BenchInput::FirstPartition => load_first_partition(&dataset_dir).await?,
  };
  info!(
    "benchmarking on {} ({} rows)",
    config.input.describe(),
    table.num_rows()
  );

  let measurements = measure_all(&table, layout, &config.queries)?;
  Ok(BenchRun {
    dataset,
    rows_measured: table.num_rows(),
    measurements,
  })
}

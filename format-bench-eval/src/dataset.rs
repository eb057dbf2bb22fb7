//! Dataset Provider: generates the synthetic source dataset as partitioned Parquet,
//! chunk by chunk, and loads it back for measurement.

use std::{
  fs::{self, File},
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use arrow::{array::RecordBatch, compute::concat_batches};
use format_bench_core::SalesGenerator;
use futures::TryStreamExt;
use log::{debug, info};
use parquet::arrow::{ArrowWriter, ParquetRecordBatchStreamBuilder};

use crate::{
  table::{records_to_batch, sales_schema, SalesTable},
  writer::parquet_properties,
};

/// Outcome of [`ensure_dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetStatus {
  Generated { partitions: usize, rows: usize },
  Reused { partitions: usize },
}

/// File name of the `index`th partition.
pub fn partition_file_name(index: usize) -> String {
  format!("part_{index:05}.parquet")
}

/// Partition files under `dir`, sorted by name. Empty if `dir` does not exist.
pub fn partition_files(dir: &Path) -> Result<Vec<PathBuf>> {
  if !dir.is_dir() {
    return Ok(Vec::new());
  }
  let mut files = Vec::new();
  for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
    let path = entry?.path();
    if path.extension().is_some_and(|ext| ext == "parquet") {
      files.push(path);
    }
  }
  files.sort();
  Ok(files)
}

/// Make sure a dataset exists at `dir`.
///
/// If `dir` already holds partition files nothing is touched. Otherwise `total_rows`
/// rows are drawn from a generator seeded with `seed` and written as partitions of at
/// most `chunk_size` rows, so only one chunk is ever held in memory. A failure midway
/// leaves the partitions written so far in place.
pub fn ensure_dataset(
  dir: &Path,
  total_rows: usize,
  chunk_size: usize,
  seed: u64,
) -> Result<DatasetStatus> {
  anyhow::ensure!(chunk_size > 0, "chunk size must be positive");

  let existing = partition_files(dir)?;
  if !existing.is_empty() {
    info!(
      "dataset already present at {} ({} partitions), skipping generation",
      dir.display(),
      existing.len()
    );
    return Ok(DatasetStatus::Reused {
      partitions: existing.len(),
    });
  }

  fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
  info!("generating {total_rows} rows into {}", dir.display());

  let mut generator = SalesGenerator::new(seed);
  let mut remaining = total_rows;
  let mut partitions = 0;
  while remaining > 0 {
    let n = remaining.min(chunk_size);
    let batch = records_to_batch(&generator.take_chunk(n))?;
    let path = dir.join(partition_file_name(partitions));
    write_partition(&path, &batch)?;
    debug!("wrote partition {} ({n} rows)", path.display());
    remaining -= n;
    partitions += 1;
  }

  info!("dataset complete: {partitions} partitions");
  Ok(DatasetStatus::Generated {
    partitions,
    rows: total_rows,
  })
}

/// Write one batch as a standalone Parquet file.
pub fn write_partition(path: &Path, batch: &RecordBatch) -> Result<()> {
  let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
  let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(parquet_properties()))?;
  writer.write(batch)?;
  writer.close()?;
  Ok(())
}

/// Read one partition file into a single batch.
pub async fn read_partition(path: impl AsRef<Path>) -> Result<RecordBatch> {
  let path = path.as_ref();
  let file = tokio::fs::File::open(path)
    .await
    .with_context(|| format!("failed to open {}", path.display()))?;

  let stream = ParquetRecordBatchStreamBuilder::new(file).await?.build()?;
  let batches: Vec<RecordBatch> = stream.try_collect().await?;

  Ok(concat_batches(&sales_schema(), &batches)?)
}

/// Load every partition under `dir`, one batch per partition, in partition order.
pub async fn load_dataset(dir: &Path) -> Result<SalesTable> {
  let mut batches = Vec::new();
  for path in partition_files(dir)? {
    batches.push(read_partition(&path).await?);
  }
  SalesTable::from_batches(batches)
}

/// Load only the first partition under `dir`.
pub async fn load_first_partition(dir: &Path) -> Result<SalesTable> {
  let Some(first) = partition_files(dir)?.into_iter().next() else {
    anyhow::bail!("no partitions found in {}", dir.display());
  };
  SalesTable::from_batches(vec![read_partition(first).await?])
}

#[cfg(test)]
mod tests {
  use format_bench_core::record::round_cents;
  use tempfile::TempDir;

  use super::*;
  use crate::layout::disk_size_bytes;

  #[tokio::test]
  async fn test_generates_chunked_partitions() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.parquet");

    let status = ensure_dataset(&source, 2_500, 1_000, 42).unwrap();
    assert_eq!(
      status,
      DatasetStatus::Generated {
        partitions: 3,
        rows: 2_500
      }
    );

    let files = partition_files(&source).unwrap();
    let names: Vec<_> = files
      .iter()
      .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
      .collect();
    assert_eq!(
      names,
      vec!["part_00000.parquet", "part_00001.parquet", "part_00002.parquet"]
    );

    let table = load_dataset(&source).await.unwrap();
    assert_eq!(table.num_rows(), 2_500);
    let rows: Vec<_> = table.batches().iter().map(|b| b.num_rows()).collect();
    assert_eq!(rows, vec![1_000, 1_000, 500]);

    for row in table.records().unwrap() {
      assert_eq!(row.total(), round_cents(row.quantity as f64 * row.unit_price));
    }

    let first = load_first_partition(&source).await.unwrap();
    assert_eq!(first.num_rows(), 1_000);
  }

  #[tokio::test]
  async fn test_second_call_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.parquet");

    ensure_dataset(&source, 800, 300, 42).unwrap();
    let size_before = disk_size_bytes(&source).unwrap();
    let rows_before = load_dataset(&source).await.unwrap().records().unwrap();

    // Different parameters must not matter once the dataset exists.
    let status = ensure_dataset(&source, 10, 5, 7).unwrap();
    assert_eq!(status, DatasetStatus::Reused { partitions: 3 });
    assert_eq!(disk_size_bytes(&source).unwrap(), size_before);
    assert_eq!(load_dataset(&source).await.unwrap().records().unwrap(), rows_before);
  }

  #[tokio::test]
  async fn test_same_seed_reproduces_dataset() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    ensure_dataset(&a, 500, 200, 9).unwrap();
    ensure_dataset(&b, 500, 500, 9).unwrap();

    let rows_a = load_dataset(&a).await.unwrap().records().unwrap();
    let rows_b = load_dataset(&b).await.unwrap().records().unwrap();
    assert_eq!(rows_a, rows_b);
  }

  #[tokio::test]
  async fn test_missing_dataset_has_no_first_partition() {
    let dir = TempDir::new().unwrap();
    assert!(load_first_partition(&dir.path().join("nothing")).await.is_err());
  }
}

//! Format Writer: persists a [`SalesTable`] in one of the formats under test and
//! reports how long the write took and how much disk it occupies.

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
  time::{Duration, Instant},
};

use anyhow::{Context, Result};
use arrow::{array::RecordBatch, csv::WriterBuilder};
use duckdb::Connection;
use format_bench_core::{record::COLUMN_NAMES, Format, BYTES_PER_MEGABYTE, TABLE_NAME};
use log::info;
use parquet::{basic::Compression, file::properties::WriterProperties};

use crate::{
  dataset::{partition_file_name, write_partition},
  layout::{disk_size_bytes, OutputLayout},
  table::SalesTable,
};

/// Writer settings shared by every Parquet file this crate produces.
pub fn parquet_properties() -> WriterProperties {
  WriterProperties::builder()
    .set_compression(Compression::SNAPPY)
    .build()
}

/// Result of writing one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
  pub duration: Duration,
  pub size_bytes: u64,
}

impl WriteOutcome {
  pub fn duration_seconds(&self) -> f64 {
    self.duration.as_secs_f64()
  }

  pub fn size_megabytes(&self) -> f64 {
    self.size_bytes as f64 / BYTES_PER_MEGABYTE
  }
}

/// Write `table` as `format` into `layout`, replacing any earlier artifact.
///
/// Only the write itself is timed; clearing the old artifact and measuring the new
/// one's size are not.
pub fn write(table: &SalesTable, format: Format, layout: &OutputLayout) -> Result<WriteOutcome> {
  let path = layout.prepare_artifact(format)?;

  let start = Instant::now();
  match format {
    Format::Parquet => write_parquet(table, &path),
    Format::Csv => write_csv(table, &path),
    Format::EmbeddedDb => write_embedded_db(table, &path),
  }
  .with_context(|| format!("failed to write {format} artifact {}", path.display()))?;
  let duration = start.elapsed();

  let size_bytes = disk_size_bytes(&path)?;
  info!(
    "{}: wrote {} rows in {:.3}s, {:.1} MB",
    format.label(),
    table.num_rows(),
    duration.as_secs_f64(),
    size_bytes as f64 / BYTES_PER_MEGABYTE
  );
  Ok(WriteOutcome {
    duration,
    size_bytes,
  })
}

/// One partition file per batch. An empty table still gets one empty partition so the
/// directory remains queryable.
fn write_parquet(table: &SalesTable, dir: &Path) -> Result<()> {
  if table.batches().is_empty() {
    let empty = RecordBatch::new_empty(table.schema());
    return write_partition(&dir.join(partition_file_name(0)), &empty);
  }
  for (idx, batch) in table.batches().iter().enumerate() {
    write_partition(&dir.join(partition_file_name(idx)), batch)?;
  }
  Ok(())
}

fn write_csv(table: &SalesTable, path: &Path) -> Result<()> {
  let file = File::create(path)?;
  let mut writer = WriterBuilder::new()
    .with_header(true)
    .build(BufWriter::new(file));
  if table.batches().is_empty() {
    writer.write(&RecordBatch::new_empty(table.schema()))?;
  }
  for batch in table.batches() {
    writer.write(batch)?;
  }
  writer.into_inner().flush()?;
  Ok(())
}

/// Column definitions of the `sales` table in the embedded database.
fn create_table_sql() -> String {
  let types = [
    "VARCHAR", "DATE", "VARCHAR", "VARCHAR", "INTEGER", "DOUBLE", "DOUBLE", "VARCHAR", "VARCHAR",
    "VARCHAR",
  ];
  let columns: Vec<String> = COLUMN_NAMES
    .iter()
    .zip(types)
    .map(|(name, ty)| format!("{name} {ty} NOT NULL"))
    .collect();
  format!("CREATE TABLE {TABLE_NAME} ({})", columns.join(", "))
}

/// Batches are handed to the appender as Arrow data, as the Parquet and CSV writers do,
/// so no per-row conversion happens inside the timed write.
fn write_embedded_db(table: &SalesTable, path: &Path) -> Result<()> {
  let conn = Connection::open(path)?;
  conn.execute_batch(&create_table_sql())?;
  {
    let mut appender = conn.appender(TABLE_NAME)?;
    for batch in table.batches() {
      appender.append_record_batch(batch.clone())?;
    }
    appender.flush()?;
  }
  conn.close().map_err(|(_, err)| err)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use rstest::rstest;
  use tempfile::TempDir;

  use super::*;
  use crate::{reader::read_artifact, util::gen_table};

  #[rstest]
  #[case(Format::Parquet)]
  #[case(Format::Csv)]
  #[case(Format::EmbeddedDb)]
  #[tokio::test]
  async fn test_write_then_read_back(#[case] format: Format) {
    let dir = TempDir::new().unwrap();
    let layout = OutputLayout::prepare(dir.path()).unwrap();
    let table = gen_table(1_200, 500, 42).unwrap();

    let outcome = write(&table, format, &layout).unwrap();
    assert!(outcome.size_bytes > 0);
    assert!(outcome.size_megabytes() > 0.0);

    let read_back = read_artifact(format, &layout.artifact_path(format)).await.unwrap();
    assert_eq!(read_back.num_rows(), 1_200);
    assert_eq!(read_back.records().unwrap(), table.records().unwrap());
  }

  #[rstest]
  #[case(Format::Parquet)]
  #[case(Format::Csv)]
  #[case(Format::EmbeddedDb)]
  #[tokio::test]
  async fn test_rewrite_replaces_previous_artifact(#[case] format: Format) {
    let dir = TempDir::new().unwrap();
    let layout = OutputLayout::prepare(dir.path()).unwrap();

    write(&gen_table(900, 300, 1).unwrap(), format, &layout).unwrap();
    write(&gen_table(100, 300, 2).unwrap(), format, &layout).unwrap();

    let read_back = read_artifact(format, &layout.artifact_path(format)).await.unwrap();
    assert_eq!(read_back.num_rows(), 100);
  }

  #[test]
  fn test_parquet_writes_one_partition_per_batch() {
    let dir = TempDir::new().unwrap();
    let layout = OutputLayout::prepare(dir.path()).unwrap();
    write(&gen_table(1_000, 400, 5).unwrap(), Format::Parquet, &layout).unwrap();

    let files = crate::dataset::partition_files(&layout.artifact_path(Format::Parquet)).unwrap();
    assert_eq!(files.len(), 3);
  }

  #[test]
  fn test_embedded_db_stores_batches_verbatim() {
    let dir = TempDir::new().unwrap();
    let layout = OutputLayout::prepare(dir.path()).unwrap();
    let source = gen_table(300, 300, 4).unwrap();

    // Totals that no row decoding would accept are stored as given.
    let batch = &source.batches()[0];
    let mut columns = batch.columns().to_vec();
    columns[6] = std::sync::Arc::new(arrow::array::Float64Array::from(vec![1.5; 300]));
    let batch = RecordBatch::try_new(source.schema(), columns).unwrap();
    let table = SalesTable::from_batches(vec![batch]).unwrap();

    write(&table, Format::EmbeddedDb, &layout).unwrap();

    let conn = Connection::open(layout.artifact_path(Format::EmbeddedDb)).unwrap();
    let (count, total, first_day): (i64, f64, String) = conn
      .query_row(
        "SELECT COUNT(*), SUM(total), CAST(MIN(sale_date) AS VARCHAR) FROM sales",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
      )
      .unwrap();
    assert_eq!(count, 300);
    assert_eq!(total, 450.0);
    let expected_day = source
      .records()
      .unwrap()
      .iter()
      .map(|r| r.sale_date)
      .min()
      .unwrap();
    assert_eq!(first_day, expected_day.format("%Y-%m-%d").to_string());
  }

  #[test]
  fn test_create_table_sql_lists_every_column() {
    let sql = create_table_sql();
    for name in COLUMN_NAMES {
      assert!(sql.contains(name));
    }
    assert!(sql.starts_with("CREATE TABLE sales ("));
  }
}

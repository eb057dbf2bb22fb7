//! Reads any benchmark artifact back into a [`SalesTable`].

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use arrow::csv::ReaderBuilder;
use chrono::NaiveDate;
use duckdb::{AccessMode, Config, Connection};
use format_bench_core::{record::COLUMN_NAMES, Format, SaleRecord, TABLE_NAME};

use crate::{
  dataset::{partition_files, read_partition},
  table::{sales_schema, SalesTable},
};

/// Rows per batch when reading back the single-file formats.
const READ_BATCH_SIZE: usize = 64 * 1024;

pub async fn read_artifact(format: Format, path: &Path) -> Result<SalesTable> {
  match format {
    Format::Parquet => {
      let mut batches = Vec::new();
      for partition in partition_files(path)? {
        batches.push(read_partition(partition).await?);
      }
      SalesTable::from_batches(batches)
    }
    Format::Csv => read_csv(path),
    Format::EmbeddedDb => read_embedded_db(path),
  }
  .with_context(|| format!("failed to read {format} artifact {}", path.display()))
}

fn read_csv(path: &Path) -> Result<SalesTable> {
  let file = File::open(path)?;
  let reader = ReaderBuilder::new(sales_schema())
    .with_header(true)
    .with_batch_size(READ_BATCH_SIZE)
    .build(BufReader::new(file))?;
  let batches = reader.collect::<Result<Vec<_>, _>>()?;
  SalesTable::from_batches(batches)
}

fn read_embedded_db(path: &Path) -> Result<SalesTable> {
  let config = Config::default().access_mode(AccessMode::ReadOnly)?;
  let conn = Connection::open_with_flags(path, config)?;

  // Dates come back as text so the row decoding stays independent of driver types.
  let columns: Vec<String> = COLUMN_NAMES
    .iter()
    .map(|name| match *name {
      "sale_date" => "CAST(sale_date AS VARCHAR)".to_string(),
      other => other.to_string(),
    })
    .collect();
  let sql = format!("SELECT {} FROM {TABLE_NAME} ORDER BY rowid", columns.join(", "));

  let mut stmt = conn.prepare(&sql)?;
  let mut rows = stmt.query([])?;
  let mut records = Vec::new();
  while let Some(row) = rows.next()? {
    let date: String = row.get(1)?;
    let sale_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
      .with_context(|| format!("bad sale date `{date}`"))?;
    let record = SaleRecord::new(
      row.get(0)?,
      sale_date,
      row.get(2)?,
      row.get(3)?,
      row.get(4)?,
      row.get(5)?,
      row.get(7)?,
      row.get(8)?,
      row.get(9)?,
    );
    let stored_total: f64 = row.get(6)?;
    anyhow::ensure!(
      stored_total == record.total(),
      "stored total {stored_total} does not match recomputed {}",
      record.total()
    );
    records.push(record);
  }
  SalesTable::from_records(&records, READ_BATCH_SIZE)
}

//! In-memory representation of the sales table as Arrow record batches.
//!
//! Each batch corresponds to one generated chunk, which is also the unit the
//! Parquet writer turns into a partition file.

use std::sync::{Arc, OnceLock};

use anyhow::{bail, ensure, Result};
use arrow::{
  array::{ArrayRef, AsArray, Date32Array, Float64Array, Int32Array, RecordBatch, StringArray},
  datatypes::{DataType, Date32Type, Field, Float64Type, Int32Type, Schema, SchemaRef},
  temporal_conversions::date32_to_datetime,
};
use format_bench_core::{record::COLUMN_NAMES, SaleRecord};

/// Arrow schema of a sales row. Column order follows [`COLUMN_NAMES`].
pub fn sales_schema() -> SchemaRef {
  static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
  SCHEMA
    .get_or_init(|| {
      let types = [
        DataType::Utf8,
        DataType::Date32,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Int32,
        DataType::Float64,
        DataType::Float64,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
      ];
      let fields: Vec<Field> = COLUMN_NAMES
        .iter()
        .zip(types)
        .map(|(name, data_type)| Field::new(*name, data_type, false))
        .collect();
      Arc::new(Schema::new(fields))
    })
    .clone()
}

pub fn records_to_batch(records: &[SaleRecord]) -> Result<RecordBatch> {
  fn strings<'a>(
    records: &'a [SaleRecord],
    field: impl Fn(&'a SaleRecord) -> &'a str,
  ) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(records.iter().map(field)))
  }

  let columns: Vec<ArrayRef> = vec![
    strings(records, |r| r.transaction_id.as_str()),
    Arc::new(Date32Array::from_iter_values(
      records.iter().map(|r| Date32Type::from_naive_date(r.sale_date)),
    )),
    strings(records, |r| r.store.as_str()),
    strings(records, |r| r.product.as_str()),
    Arc::new(Int32Array::from_iter_values(records.iter().map(|r| r.quantity))),
    Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.unit_price))),
    Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.total()))),
    strings(records, |r| r.customer.as_str()),
    strings(records, |r| r.city.as_str()),
    strings(records, |r| r.region.as_str()),
  ];

  Ok(RecordBatch::try_new(sales_schema(), columns)?)
}

/// Decode a batch back into rows. Fails if a stored total disagrees with the one
/// recomputed from quantity and unit price.
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<SaleRecord>> {
  ensure!(
    batch.num_columns() == COLUMN_NAMES.len(),
    "expected {} columns, found {}",
    COLUMN_NAMES.len(),
    batch.num_columns()
  );
  let text = |idx: usize| batch.column(idx).as_string::<i32>();
  let ids = text(0);
  let dates = batch.column(1).as_primitive::<Date32Type>();
  let stores = text(2);
  let products = text(3);
  let quantities = batch.column(4).as_primitive::<Int32Type>();
  let prices = batch.column(5).as_primitive::<Float64Type>();
  let totals = batch.column(6).as_primitive::<Float64Type>();
  let customers = text(7);
  let cities = text(8);
  let regions = text(9);

  let mut records = Vec::with_capacity(batch.num_rows());
  for row in 0..batch.num_rows() {
    let Some(sale_date) = date32_to_datetime(dates.value(row)).map(|dt| dt.date()) else {
      bail!("row {row}: sale date out of range");
    };
    let record = SaleRecord::new(
      ids.value(row).to_string(),
      sale_date,
      stores.value(row).to_string(),
      products.value(row).to_string(),
      quantities.value(row),
      prices.value(row),
      customers.value(row).to_string(),
      cities.value(row).to_string(),
      regions.value(row).to_string(),
    );
    if record.total() != totals.value(row) {
      bail!(
        "row {row}: stored total {} does not match {} x {}",
        totals.value(row),
        record.quantity,
        record.unit_price
      );
    }
    records.push(record);
  }
  Ok(records)
}

/// The table being benchmarked: an ordered list of batches sharing [`sales_schema`].
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
  batches: Vec<RecordBatch>,
}

impl SalesTable {
  pub fn from_batches(batches: Vec<RecordBatch>) -> Result<SalesTable> {
    let schema = sales_schema();
    for batch in &batches {
      ensure!(
        batch.schema().fields() == schema.fields(),
        "batch schema does not match the sales schema: {:?}",
        batch.schema()
      );
    }
    Ok(SalesTable { batches })
  }

  /// Build a table from rows, one batch per `batch_size` rows.
  pub fn from_records(records: &[SaleRecord], batch_size: usize) -> Result<SalesTable> {
    ensure!(batch_size > 0, "batch size must be positive");
    let batches = records
      .chunks(batch_size)
      .map(records_to_batch)
      .collect::<Result<Vec<_>>>()?;
    Ok(SalesTable { batches })
  }

  pub fn schema(&self) -> SchemaRef {
    sales_schema()
  }

  pub fn batches(&self) -> &[RecordBatch] {
    &self.batches
  }

  pub fn num_rows(&self) -> usize {
    self.batches.iter().map(RecordBatch::num_rows).sum()
  }

  pub fn records(&self) -> Result<Vec<SaleRecord>> {
    let mut records = Vec::with_capacity(self.num_rows());
    for batch in &self.batches {
      records.extend(batch_to_records(batch)?);
    }
    Ok(records)
  }
}

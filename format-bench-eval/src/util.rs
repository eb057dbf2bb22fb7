use anyhow::Result;
use format_bench_core::SalesGenerator;

use crate::table::SalesTable;

/// Seeded in-memory table of `rows` rows split into batches of `batch_size`.
pub fn gen_table(rows: usize, batch_size: usize, seed: u64) -> Result<SalesTable> {
  let records = SalesGenerator::new(seed).take_chunk(rows);
  SalesTable::from_records(&records, batch_size)
}

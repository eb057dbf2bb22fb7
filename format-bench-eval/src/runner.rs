//! Query Runner: exposes one artifact to a fresh in-memory DuckDB session and times the
//! query battery against it.
//!
//! Parquet and CSV artifacts are wrapped in a view named `sales`; the embedded database
//! file is attached read-only and made the default catalog. A session belongs to one
//! format and is closed after its batch, so nothing is cached across formats.

use std::time::Instant;

use anyhow::{Context, Result};
use duckdb::Connection;
use format_bench_core::{query::count_rows_sql, Format, QuerySet, QueryTiming, TABLE_NAME};
use log::{debug, info};

use crate::layout::{sql_path_literal, OutputLayout};

const ATTACHED_DB: &str = "bench_db";

pub struct QuerySession {
  format: Format,
  conn: Connection,
}

impl QuerySession {
  pub fn open(format: Format, layout: &OutputLayout) -> Result<QuerySession> {
    let conn = Connection::open_in_memory()?;
    let path = layout.artifact_path(format);
    let setup = match format {
      Format::Parquet => format!(
        "CREATE VIEW {TABLE_NAME} AS SELECT * FROM read_parquet({})",
        sql_path_literal(&path.join("*.parquet"))
      ),
      Format::Csv => format!(
        "CREATE VIEW {TABLE_NAME} AS SELECT * FROM read_csv_auto({})",
        sql_path_literal(&path)
      ),
      Format::EmbeddedDb => format!(
        "ATTACH {} AS {ATTACHED_DB} (READ_ONLY); USE {ATTACHED_DB};",
        sql_path_literal(&path)
      ),
    };
    debug!("{format}: {setup}");
    conn
      .execute_batch(&setup)
      .with_context(|| format!("failed to expose {format} artifact {}", path.display()))?;
    Ok(QuerySession { format, conn })
  }

  pub fn format(&self) -> Format {
    self.format
  }

  /// Run every query of `queries` in order. Each latency covers execution and fetching
  /// the complete result.
  pub fn run(&self, queries: &QuerySet) -> Result<Vec<QueryTiming>> {
    let mut timings = Vec::with_capacity(queries.len());
    for query in queries.iter() {
      let start = Instant::now();
      let fetched = self
        .fetch_all(&query.sql)
        .with_context(|| format!("query `{}` failed on {}", query.name, self.format))?;
      let duration = start.elapsed();
      info!(
        "{}: {} returned {fetched} rows in {:.3}s",
        self.format.label(),
        query.name,
        duration.as_secs_f64()
      );
      timings.push(QueryTiming {
        name: query.name.clone(),
        duration,
      });
    }
    Ok(timings)
  }

  pub fn count_rows(&self) -> Result<u64> {
    let count: i64 = self.conn.query_row(&count_rows_sql(), [], |row| row.get(0))?;
    Ok(count as u64)
  }

  /// Execute `sql` and drain every result row.
  fn fetch_all(&self, sql: &str) -> Result<usize> {
    let mut stmt = self.conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut fetched = 0;
    while rows.next()?.is_some() {
      fetched += 1;
    }
    Ok(fetched)
  }

  pub fn close(self) -> Result<()> {
    self.conn.close().map_err(|(_, err)| err)?;
    Ok(())
  }
}

/// Open a session for `format`, run `queries`, close the session.
pub fn run_queries(
  format: Format,
  layout: &OutputLayout,
  queries: &QuerySet,
) -> Result<Vec<QueryTiming>> {
  let session = QuerySession::open(format, layout)?;
  let timings = session.run(queries)?;
  session.close()?;
  Ok(timings)
}

//! This crate implements the storage format benchmark harness, including:
//! - Synthetic dataset provisioning as partitioned Parquet
//! - Writers for Parquet, CSV and an embedded DuckDB file
//! - A query runner timing a fixed SQL battery through in-memory DuckDB sessions
//! - The summary table and the notebook report with its charts

pub mod dataset;
pub mod layout;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod runner;
pub mod summary;
pub mod table;
pub mod util;
pub mod writer;

pub use layout::OutputLayout;
pub use pipeline::{measure_all, measure_format, run_benchmark, BenchRun};
pub use table::SalesTable;

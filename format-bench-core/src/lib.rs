//! This crate provides the domain model of the storage format benchmark:
//! - The synthetic sales row and its seeded generator
//! - The formats under test and the fixed analytical query set
//! - The per-format measurement record
//! - The benchmark configuration passed into every stage
//!
//! Nothing here touches the filesystem; the harness lives in `format-bench-eval`.

pub mod config;
pub mod format;
pub mod generator;
pub mod measurement;
pub mod query;
pub mod record;

pub use config::{BenchConfig, BenchInput};
pub use format::Format;
pub use generator::SalesGenerator;
pub use measurement::{Measurement, QueryTiming};
pub use query::{BenchQuery, QuerySet};
pub use record::SaleRecord;

/// Name of the table every format exposes to the query session.
pub const TABLE_NAME: &str = "sales";

/// Bytes per reported megabyte.
pub const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

use std::path::PathBuf;

use anyhow::{ensure, Result};

use crate::query::QuerySet;

/// Which rows the formats are measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BenchInput {
  /// Every generated partition.
  #[default]
  FullDataset,
  /// Only the first partition, at most `chunk_size` rows.
  FirstPartition,
}

impl BenchInput {
  pub fn describe(self) -> &'static str {
    match self {
      BenchInput::FullDataset => "the full generated dataset",
      BenchInput::FirstPartition => "the first generated partition",
    }
  }
}

/// Settings for one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
  /// Root directory for the source dataset, the artifacts and the report.
  pub output_dir: PathBuf,
  pub total_rows: usize,
  /// Rows per generated partition; bounds peak memory during generation.
  pub chunk_size: usize,
  pub seed: u64,
  pub input: BenchInput,
  pub queries: QuerySet,
}

impl Default for BenchConfig {
  fn default() -> Self {
    BenchConfig {
      output_dir: PathBuf::from("data"),
      total_rows: 1_000_000,
      chunk_size: 250_000,
      seed: 42,
      input: BenchInput::FullDataset,
      queries: QuerySet::standard(),
    }
  }
}

impl BenchConfig {
  pub fn validate(&self) -> Result<()> {
    ensure!(self.chunk_size > 0, "chunk size must be positive");
    ensure!(self.total_rows > 0, "row count must be positive");
    ensure!(!self.queries.is_empty(), "query set is empty");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_matches_benchmark_constants() {
    let config = BenchConfig::default();
    assert_eq!(config.total_rows, 1_000_000);
    assert_eq!(config.chunk_size, 250_000);
    assert_eq!(config.queries.len(), 3);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_zero_chunk_rejected() {
    let config = BenchConfig {
      chunk_size: 0,
      ..BenchConfig::default()
    };
    assert!(config.validate().is_err());
  }
}

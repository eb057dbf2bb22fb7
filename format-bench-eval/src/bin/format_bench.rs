use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use format_bench_core::{BenchConfig, BenchInput};
use format_bench_eval::{
  report::{self, charts, ReportInput},
  run_benchmark,
  summary::format_summary,
  OutputLayout,
};
use log::{info, warn};

/// Benchmarks Parquet, CSV and an embedded DuckDB file on write time, on-disk size and
/// query latency, then writes a notebook report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Directory for the dataset, the artifacts and the report
  #[arg(long, default_value = "data")]
  output_dir: PathBuf,
  /// Total number of synthetic rows to generate
  #[arg(long, default_value_t = 1_000_000)]
  rows: usize,
  /// Rows per generated partition
  #[arg(long, default_value_t = 250_000)]
  chunk_size: usize,
  #[arg(long, default_value_t = 42)]
  seed: u64,
  /// Measure on the first partition only instead of the full dataset
  #[arg(long)]
  sample: bool,
  /// Report path (defaults to report.ipynb inside the output directory)
  #[arg(long)]
  report: Option<PathBuf>,
}

impl Args {
  fn config(&self) -> BenchConfig {
    BenchConfig {
      output_dir: self.output_dir.clone(),
      total_rows: self.rows,
      chunk_size: self.chunk_size,
      seed: self.seed,
      input: if self.sample {
        BenchInput::FirstPartition
      } else {
        BenchInput::FullDataset
      },
      ..BenchConfig::default()
    }
  }
}

fn main() -> Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  let args = Args::parse();
  let config = args.config();
  config.validate()?;

  let layout = OutputLayout::prepare(&config.output_dir)?;
  let runtime = tokio::runtime::Builder::new_current_thread().build()?;
  let run = runtime.block_on(run_benchmark(&config, &layout))?;

  println!("\nSummary:\n{}", format_summary(&run.measurements)?);

  let notebook = report::compose(&ReportInput {
    measurements: &run.measurements,
    rows_measured: run.rows_measured,
    input: config.input,
    generated_at: chrono::Local::now().naive_local(),
  })?;
  let report_path = args.report.unwrap_or_else(|| layout.report_path());
  report::write_notebook(&notebook, &report_path)?;

  match charts::render_all(&run.measurements, &layout.charts_dir()) {
    Ok(paths) => {
      for path in paths {
        info!("chart written to {}", path.display());
      }
    }
    Err(err) => warn!("failed to render charts: {err:#}"),
  }

  println!("\n{} written", report_path.display());
  Ok(())
}

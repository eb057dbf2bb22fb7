//! nbformat 4 notebook built as a pure function of the measurements.

use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{ensure, Context, Result};
use chrono::NaiveDateTime;
use format_bench_core::{measurement::round_to, BenchInput, Format, Measurement};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Everything the report needs to know about a run.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
  pub measurements: &'a [Measurement],
  pub rows_measured: usize,
  pub input: BenchInput,
  pub generated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
  Markdown {
    id: String,
    metadata: Map<String, Value>,
    source: String,
  },
  Code {
    id: String,
    execution_count: Option<u32>,
    metadata: Map<String, Value>,
    outputs: Vec<Value>,
    source: String,
  },
}

impl Cell {
  pub fn source(&self) -> &str {
    match self {
      Cell::Markdown { source, .. } | Cell::Code { source, .. } => source,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notebook {
  pub cells: Vec<Cell>,
  pub metadata: Value,
  pub nbformat: u32,
  pub nbformat_minor: u32,
}

impl Notebook {
  fn new() -> Notebook {
    Notebook {
      cells: Vec::new(),
      metadata: json!({
        "kernelspec": { "display_name": "Python 3", "language": "python", "name": "python3" },
        "language_info": { "name": "python" }
      }),
      nbformat: 4,
      nbformat_minor: 5,
    }
  }

  fn markdown(&mut self, source: String) {
    let id = format!("cell-{}", self.cells.len());
    self.cells.push(Cell::Markdown {
      id,
      metadata: Map::new(),
      source,
    });
  }

  fn code(&mut self, source: String) {
    let id = format!("cell-{}", self.cells.len());
    self.cells.push(Cell::Code {
      id,
      execution_count: None,
      metadata: Map::new(),
      outputs: Vec::new(),
      source,
    });
  }
}

/// JSON records snapshot embedded into the notebook's code cell.
pub fn snapshot(measurements: &[Measurement]) -> Value {
  let records = measurements
    .iter()
    .map(|m| {
      let mut record = Map::new();
      record.insert("format".into(), json!(m.format.label()));
      record.insert("write_s".into(), json!(round_to(m.write_seconds(), 3)));
      record.insert("size_mb".into(), json!(round_to(m.size_megabytes(), 3)));
      for timing in &m.query_timings {
        record.insert(format!("{}_s", timing.name), json!(round_to(timing.seconds(), 3)));
      }
      Value::Object(record)
    })
    .collect();
  Value::Array(records)
}

fn plot_source(snapshot: &str) -> String {
  format!(
    r#"import pandas as pd, matplotlib.pyplot as plt
from io import StringIO
df = pd.read_json(StringIO('''{snapshot}'''))
df.set_index('format', inplace=True)
display(df)

# query latency per format
fig, ax = plt.subplots(figsize=(10, 5))
df[[c for c in df.columns if c.endswith('_s') and c != 'write_s']].plot.bar(ax=ax)
ax.set_ylabel('Time (s)'); ax.set_title('Query latency per format')
plt.xticks(rotation=0); plt.grid(axis='y', linestyle='--', alpha=.6)
plt.tight_layout()
plt.show()

# size vs write time
fig, ax1 = plt.subplots(figsize=(8, 4))
df['size_mb'].plot.bar(ax=ax1, color='grey', alpha=.6, label='Size (MB)')
ax1.set_ylabel('MB'); ax1.set_title('Size and write time')
ax2 = ax1.twinx(); df['write_s'].plot(ax=ax2, color='red', marker='o', label='Write (s)')
ax2.set_ylabel('Write (s)')
ax1.legend(loc='upper left'); ax2.legend(loc='upper right')
plt.xticks(rotation=0); plt.tight_layout(); plt.show()"#
  )
}

fn lowest(measurements: &[Measurement], key: impl Fn(&Measurement) -> f64) -> Option<&Measurement> {
  measurements
    .iter()
    .min_by(|a, b| key(a).total_cmp(&key(b)))
}

fn discussion(measurements: &[Measurement]) -> String {
  let mut text = String::from("## 2 | Discussion\n");
  if let Some(smallest) = lowest(measurements, |m| m.size_bytes as f64) {
    text.push_str(&format!(
      "- **Smallest artifact**: {} ({:.3} MB).\n",
      smallest.format.label(),
      smallest.size_megabytes()
    ));
  }
  if let Some(fastest) = lowest(measurements, Measurement::write_seconds) {
    text.push_str(&format!(
      "- **Fastest write**: {} ({:.3} s).\n",
      fastest.format.label(),
      fastest.write_seconds()
    ));
  }
  let query_names = measurements
    .first()
    .map(Measurement::query_names)
    .unwrap_or_default();
  for name in query_names {
    let fastest = lowest(measurements, |m| m.query_seconds(name).unwrap_or(f64::INFINITY));
    if let Some(fastest) = fastest {
      text.push_str(&format!(
        "- **{name}**: fastest on {} ({:.3} s).\n",
        fastest.format.label(),
        fastest.query_seconds(name).unwrap_or_default()
      ));
    }
  }
  text
}

fn format_list() -> String {
  Format::ALL
    .iter()
    .map(|f| f.label())
    .collect::<Vec<_>>()
    .join(", ")
}

/// Build the report for `input`. Depends on nothing but its argument.
pub fn compose(input: &ReportInput<'_>) -> Result<Notebook> {
  ensure!(!input.measurements.is_empty(), "no measurements to report");

  let mut notebook = Notebook::new();
  notebook.markdown(
    "# Storage Format Benchmark\nReport generated automatically from the benchmark run."
      .to_string(),
  );
  notebook.markdown(format!(
    "## 1 | Methodology\n\
     - **Dataset**: {} synthetic sales rows (10 columns), taken from {}.\n\
     - **Formats tested**: {}.\n\
     - **Metrics**: write time, on-disk size and latency of {} SQL queries.",
    input.rows_measured,
    input.input.describe(),
    format_list(),
    input.measurements[0].query_timings.len()
  ));
  let snapshot = serde_json::to_string(&snapshot(input.measurements))?;
  notebook.code(plot_source(&snapshot));
  notebook.markdown(discussion(input.measurements));
  notebook.markdown(format!(
    "## 3 | Conclusion\n\
     The choice of storage format directly affects storage cost and query latency.\n\n\
     *Report generated at: {}*",
    input.generated_at.format("%Y-%m-%d %H:%M:%S")
  ));
  Ok(notebook)
}

pub fn write_notebook(notebook: &Notebook, path: &Path) -> Result<()> {
  let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
  serde_json::to_writer_pretty(BufWriter::new(file), notebook)
    .with_context(|| format!("failed to write {}", path.display()))?;
  Ok(())
}

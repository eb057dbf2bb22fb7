//! Filesystem locations for one benchmark run.
//!
//! Everything lives under a single root: the generated source dataset, one artifact
//! per format, the notebook report and its charts. Tests point the root at a
//! temporary directory.

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use format_bench_core::Format;
use log::debug;

const SOURCE_DIR: &str = "source.parquet";
const ARTIFACT_STEM: &str = "sales";
const REPORT_FILE: &str = "report.ipynb";
const CHARTS_DIR: &str = "charts";

/// Handle to a prepared output directory.
#[derive(Debug, Clone)]
pub struct OutputLayout {
  root: PathBuf,
}

impl OutputLayout {
  /// Create `root` (and parents) if needed and return a handle to it.
  pub fn prepare(root: impl AsRef<Path>) -> Result<OutputLayout> {
    let root = root.as_ref();
    fs::create_dir_all(root)
      .with_context(|| format!("failed to create output directory {}", root.display()))?;
    let root = root
      .canonicalize()
      .with_context(|| format!("failed to resolve {}", root.display()))?;
    Ok(OutputLayout { root })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directory holding the generated dataset partitions.
  pub fn dataset_dir(&self) -> PathBuf {
    self.root.join(SOURCE_DIR)
  }

  pub fn artifact_path(&self, format: Format) -> PathBuf {
    self
      .root
      .join(format!("{ARTIFACT_STEM}.{}", format.id()))
  }

  pub fn report_path(&self) -> PathBuf {
    self.root.join(REPORT_FILE)
  }

  pub fn charts_dir(&self) -> PathBuf {
    self.root.join(CHARTS_DIR)
  }

  /// Destroy whatever a previous run left at the artifact path of `format` and return
  /// the path, ready to be written. Partitioned formats get a fresh empty directory.
  pub fn prepare_artifact(&self, format: Format) -> Result<PathBuf> {
    let path = self.artifact_path(format);
    remove_path(&path)?;
    if format.is_partitioned() {
      fs::create_dir_all(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    }
    debug!("prepared {} artifact at {}", format, path.display());
    Ok(path)
  }
}

fn remove_path(path: &Path) -> Result<()> {
  let Ok(metadata) = fs::symlink_metadata(path) else {
    return Ok(());
  };
  if metadata.is_dir() {
    fs::remove_dir_all(path).with_context(|| format!("failed to remove {}", path.display()))
  } else {
    fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))
  }
}

/// Total size in bytes of a file, or of every file below a directory.
pub fn disk_size_bytes(path: &Path) -> Result<u64> {
  let metadata =
    fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;
  if !metadata.is_dir() {
    return Ok(metadata.len());
  }

  let mut total = 0;
  for entry in fs::read_dir(path).with_context(|| format!("failed to list {}", path.display()))? {
    total += disk_size_bytes(&entry?.path())?;
  }
  Ok(total)
}

/// Quote a path as a SQL string literal.
pub fn sql_path_literal(path: &Path) -> String {
  format!("'{}'", path.display().to_string().replace('\'', "''"))
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_artifact_paths_are_distinct() {
    let dir = TempDir::new().unwrap();
    let layout = OutputLayout::prepare(dir.path().join("nested/out")).unwrap();
    assert!(layout.root().is_dir());

    let mut paths: Vec<_> = Format::ALL.iter().map(|f| layout.artifact_path(*f)).collect();
    paths.push(layout.dataset_dir());
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 4);
  }

  #[test]
  fn test_prepare_artifact_clears_previous_output() {
    let dir = TempDir::new().unwrap();
    let layout = OutputLayout::prepare(dir.path()).unwrap();

    let parquet = layout.prepare_artifact(Format::Parquet).unwrap();
    fs::write(parquet.join("stale.parquet"), b"stale").unwrap();
    let parquet = layout.prepare_artifact(Format::Parquet).unwrap();
    assert!(parquet.is_dir());
    assert_eq!(fs::read_dir(&parquet).unwrap().count(), 0);

    let csv = layout.artifact_path(Format::Csv);
    fs::write(&csv, b"old").unwrap();
    let csv = layout.prepare_artifact(Format::Csv).unwrap();
    assert!(!csv.exists());
  }

  #[test]
  fn test_disk_size_is_recursive() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("a/b")).unwrap();
    fs::write(dir.path().join("top"), vec![0u8; 10]).unwrap();
    fs::write(dir.path().join("a/mid"), vec![0u8; 20]).unwrap();
    fs::write(dir.path().join("a/b/leaf"), vec![0u8; 30]).unwrap();

    assert_eq!(disk_size_bytes(dir.path()).unwrap(), 60);
    assert_eq!(disk_size_bytes(&dir.path().join("a/mid")).unwrap(), 20);
    assert!(disk_size_bytes(&dir.path().join("missing")).is_err());
  }

  #[test]
  fn test_sql_literal_escapes_quotes() {
    assert_eq!(sql_path_literal(Path::new("/tmp/o'brien")), "'/tmp/o''brien'");
  }
}

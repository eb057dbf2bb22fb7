use std::{fmt, str::FromStr};

use anyhow::{bail, Error};

/// A storage format under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
  /// Columnar, a directory of partition files.
  Parquet,
  /// Row-oriented plain text, a single file with a header row.
  Csv,
  /// Single-file embedded analytical database.
  EmbeddedDb,
}

impl Format {
  /// Every format, in measurement order.
  pub const ALL: [Format; 3] = [Format::Parquet, Format::Csv, Format::EmbeddedDb];

  /// Stable identifier, also used as the artifact file extension.
  pub fn id(self) -> &'static str {
    match self {
      Format::Parquet => "parquet",
      Format::Csv => "csv",
      Format::EmbeddedDb => "duckdb",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Format::Parquet => "PARQUET",
      Format::Csv => "CSV",
      Format::EmbeddedDb => "DUCKDB",
    }
  }

  /// Whether the artifact is a directory of files rather than a single file.
  pub fn is_partitioned(self) -> bool {
    matches!(self, Format::Parquet)
  }
}

impl fmt::Display for Format {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

impl FromStr for Format {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "parquet" => Ok(Format::Parquet),
      "csv" => Ok(Format::Csv),
      "duckdb" | "embedded_db" => Ok(Format::EmbeddedDb),
      other => bail!("unknown format `{other}`, expected one of parquet, csv, duckdb"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_round_trips_identifiers() {
    for format in Format::ALL {
      assert_eq!(format.id().parse::<Format>().unwrap(), format);
      assert_eq!(format.label().parse::<Format>().unwrap(), format);
    }
    assert_eq!("embedded_db".parse::<Format>().unwrap(), Format::EmbeddedDb);
    assert!("orc".parse::<Format>().is_err());
  }

  #[test]
  fn test_only_parquet_is_partitioned() {
    let partitioned: Vec<_> = Format::ALL.into_iter().filter(|f| f.is_partitioned()).collect();
    assert_eq!(partitioned, vec![Format::Parquet]);
  }
}

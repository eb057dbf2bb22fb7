use std::time::Duration;

use crate::{format::Format, BYTES_PER_MEGABYTE};

/// Latency of one named query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTiming {
  pub name: String,
  pub duration: Duration,
}

impl QueryTiming {
  pub fn seconds(&self) -> f64 {
    self.duration.as_secs_f64()
  }
}

/// Everything measured for one format in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
  pub format: Format,
  pub write_duration: Duration,
  pub size_bytes: u64,
  /// Ordered as the query set that produced them.
  pub query_timings: Vec<QueryTiming>,
}

impl Measurement {
  pub fn write_seconds(&self) -> f64 {
    self.write_duration.as_secs_f64()
  }

  pub fn size_megabytes(&self) -> f64 {
    self.size_bytes as f64 / BYTES_PER_MEGABYTE
  }

  pub fn query_seconds(&self, name: &str) -> Option<f64> {
    self
      .query_timings
      .iter()
      .find(|timing| timing.name == name)
      .map(QueryTiming::seconds)
  }

  pub fn query_names(&self) -> Vec<&str> {
    self.query_timings.iter().map(|t| t.name.as_str()).collect()
  }
}

/// Round to `places` decimals for display.
pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_accessors() {
    let measurement = Measurement {
      format: Format::Csv,
      write_duration: Duration::from_millis(1500),
      size_bytes: 3 * 1024 * 1024,
      query_timings: vec![
        QueryTiming {
          name: "a".to_string(),
          duration: Duration::from_millis(20),
        },
        QueryTiming {
          name: "b".to_string(),
          duration: Duration::from_millis(5),
        },
      ],
    };
    assert_eq!(measurement.write_seconds(), 1.5);
    assert_eq!(measurement.size_megabytes(), 3.0);
    assert_eq!(measurement.query_seconds("a"), Some(0.02));
    assert_eq!(measurement.query_seconds("missing"), None);
    assert_eq!(measurement.query_names(), vec!["a", "b"]);
  }

  #[test]
  fn test_round_to() {
    assert_eq!(round_to(0.123456, 3), 0.123);
    assert_eq!(round_to(12.349, 1), 12.3);
  }
}

use chrono::NaiveDate;

/// Column names of a sales row, in storage order.
pub const COLUMN_NAMES: [&str; 10] = [
  "transaction_id",
  "sale_date",
  "store",
  "product",
  "quantity",
  "unit_price",
  "total",
  "customer",
  "city",
  "region",
];

/// One synthetic sales transaction.
///
/// `total` is derived from `quantity` and `unit_price` and is never set independently,
/// so a constructed record always satisfies `total == round(quantity * unit_price, 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
  pub transaction_id: String,
  pub sale_date: NaiveDate,
  pub store: String,
  pub product: String,
  pub quantity: i32,
  pub unit_price: f64,
  total: f64,
  pub customer: String,
  pub city: String,
  pub region: String,
}

impl SaleRecord {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    transaction_id: String,
    sale_date: NaiveDate,
    store: String,
    product: String,
    quantity: i32,
    unit_price: f64,
    customer: String,
    city: String,
    region: String,
  ) -> SaleRecord {
    let total = round_cents(quantity as f64 * unit_price);
    SaleRecord {
      transaction_id,
      sale_date,
      store,
      product,
      quantity,
      unit_price,
      total,
      customer,
      city,
      region,
    }
  }

  pub fn total(&self) -> f64 {
    self.total
  }
}

/// Round to 2 decimal places.
pub fn round_cents(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
  use rstest::rstest;

  use super::*;

  fn record(quantity: i32, unit_price: f64) -> SaleRecord {
    SaleRecord::new(
      "id".to_string(),
      NaiveDate::from_ymd_opt(2021, 5, 17).unwrap(),
      "Silva Games".to_string(),
      "Console".to_string(),
      quantity,
      unit_price,
      "Ana Souza".to_string(),
      "Recife".to_string(),
      "PE".to_string(),
    )
  }

  #[rstest]
  #[case(3, 0.29, 0.87)]
  #[case(6, 99.99, 599.94)]
  #[case(1, 0.0, 0.0)]
  #[case(5, 12.35, 61.75)]
  fn test_total_is_rounded_product(#[case] quantity: i32, #[case] price: f64, #[case] expected: f64) {
    let row = record(quantity, price);
    assert_eq!(row.total(), expected);
    assert_eq!(row.total(), round_cents(quantity as f64 * price));
  }

  #[test]
  fn test_column_count_matches_record() {
    assert_eq!(COLUMN_NAMES.len(), 10);
    assert_eq!(COLUMN_NAMES[6], "total");
  }
}

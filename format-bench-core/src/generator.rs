use chrono::{Days, NaiveDate};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use uuid::Builder;

use crate::record::SaleRecord;

pub const PRODUCTS: [&str; 5] = ["Console", "Game", "Funko", "Controller", "Headset"];

const FIRST_NAMES: [&str; 24] = [
  "Ana", "Bruno", "Camila", "Daniel", "Eduarda", "Felipe", "Gabriela", "Heitor", "Isabela",
  "João", "Larissa", "Lucas", "Mariana", "Matheus", "Natália", "Otávio", "Paula", "Rafael",
  "Sofia", "Thiago", "Valentina", "Vinícius", "Yasmin", "Zeca",
];

const LAST_NAMES: [&str; 24] = [
  "Almeida", "Barbosa", "Cardoso", "Costa", "Dias", "Fernandes", "Gomes", "Lima", "Martins",
  "Melo", "Monteiro", "Moreira", "Nascimento", "Oliveira", "Pereira", "Pinto", "Ribeiro",
  "Rocha", "Santos", "Silva", "Souza", "Teixeira", "Vieira", "Azevedo",
];

const COMPANY_SUFFIXES: [&str; 6] = ["Games", "Ltda.", "S.A.", "e Filhos", "Comércio", "Digital"];

const CITIES: [&str; 20] = [
  "São Paulo", "Rio de Janeiro", "Belo Horizonte", "Salvador", "Fortaleza", "Recife",
  "Curitiba", "Porto Alegre", "Manaus", "Belém", "Goiânia", "Campinas", "São Luís", "Maceió",
  "Natal", "Teresina", "João Pessoa", "Florianópolis", "Vitória", "Cuiabá",
];

const REGIONS: [&str; 27] = [
  "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
  "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Highest unit price in cents (prices have at most 4 digits of cents).
const MAX_PRICE_CENTS: u32 = 9_999;
const MAX_QUANTITY: i32 = 6;

/// Deterministic source of [`SaleRecord`]s.
///
/// Two generators built from the same seed yield the same sequence of rows, no matter
/// how the caller splits the sequence into chunks.
pub struct SalesGenerator {
  rng: SmallRng,
  first_day: NaiveDate,
  day_span: u64,
}

impl SalesGenerator {
  pub fn new(seed: u64) -> SalesGenerator {
    // Sale dates fall anywhere within the 2020s.
    let first_day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
    let last_day = NaiveDate::from_ymd_opt(2029, 12, 31).unwrap_or_default();
    let day_span = (last_day - first_day).num_days() as u64;
    SalesGenerator {
      rng: SmallRng::seed_from_u64(seed),
      first_day,
      day_span,
    }
  }

  pub fn next_record(&mut self) -> SaleRecord {
    let transaction_id = Builder::from_random_bytes(self.rng.gen())
      .into_uuid()
      .to_string();
    let sale_date = self.first_day + Days::new(self.rng.gen_range(0..=self.day_span));
    let store = format!("{} {}", self.pick(&LAST_NAMES), self.pick(&COMPANY_SUFFIXES));
    let product = self.pick(&PRODUCTS).to_string();
    let quantity = self.rng.gen_range(1..=MAX_QUANTITY);
    let unit_price = self.rng.gen_range(0..=MAX_PRICE_CENTS) as f64 / 100.0;
    let customer = format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES));
    let city = self.pick(&CITIES).to_string();
    let region = self.pick(&REGIONS).to_string();

    SaleRecord::new(
      transaction_id,
      sale_date,
      store,
      product,
      quantity,
      unit_price,
      customer,
      city,
      region,
    )
  }

  /// Draw the next `n` rows.
  pub fn take_chunk(&mut self, n: usize) -> Vec<SaleRecord> {
    (0..n).map(|_| self.next_record()).collect()
  }

  fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
    // Every word list above is non-empty.
    choices.choose(&mut self.rng).copied().unwrap_or_default()
  }
}

impl Iterator for SalesGenerator {
  type Item = SaleRecord;

  fn next(&mut self) -> Option<SaleRecord> {
    Some(self.next_record())
  }
}

#[cfg(test)]
mod tests {
  use crate::record::round_cents;

  use super::*;

  #[test]
  fn test_same_seed_same_rows() {
    let first: Vec<_> = SalesGenerator::new(42).take(200).collect();
    let second: Vec<_> = SalesGenerator::new(42).take(200).collect();
    assert_eq!(first, second);

    let other: Vec<_> = SalesGenerator::new(7).take(200).collect();
    assert_ne!(first, other);
  }

  #[test]
  fn test_chunking_does_not_change_sequence() {
    let whole = SalesGenerator::new(1).take_chunk(100);
    let mut generator = SalesGenerator::new(1);
    let mut chunked = generator.take_chunk(30);
    chunked.extend(generator.take_chunk(70));
    assert_eq!(whole, chunked);
  }

  #[test]
  fn test_field_domains() {
    let lower = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let upper = NaiveDate::from_ymd_opt(2029, 12, 31).unwrap();
    for row in SalesGenerator::new(42).take(5_000) {
      assert!((1..=6).contains(&row.quantity));
      assert!((0.0..=99.99).contains(&row.unit_price));
      assert_eq!(row.unit_price, round_cents(row.unit_price));
      assert_eq!(row.total(), round_cents(row.quantity as f64 * row.unit_price));
      assert!(row.sale_date >= lower && row.sale_date <= upper);
      assert!(PRODUCTS.contains(&row.product.as_str()));
      assert!(REGIONS.contains(&row.region.as_str()));
      assert_eq!(row.transaction_id.len(), 36);
      assert_eq!(row.transaction_id.as_bytes()[14], b'4');
    }
  }
}

use crate::TABLE_NAME;

/// A named analytical query run against the `sales` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchQuery {
  pub name: String,
  pub sql: String,
}

impl BenchQuery {
  pub fn new(name: impl Into<String>, sql: impl Into<String>) -> BenchQuery {
    BenchQuery {
      name: name.into(),
      sql: sql.into(),
    }
  }
}

/// An ordered battery of queries. Iteration order is insertion order, and every
/// measurement taken with the same set carries exactly these names in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
  queries: Vec<BenchQuery>,
}

impl QuerySet {
  /// The three fixed aggregations: top stores by revenue, top customers by average
  /// ticket, top products by units sold.
  pub fn standard() -> QuerySet {
    QuerySet {
      queries: vec![
        BenchQuery::new(
          "sales_by_store",
          format!(
            "SELECT store, SUM(total) AS store_total \
             FROM {TABLE_NAME} \
             GROUP BY store \
             ORDER BY store_total DESC \
             LIMIT 10"
          ),
        ),
        BenchQuery::new(
          "avg_ticket_by_customer",
          format!(
            "SELECT customer, AVG(total) AS avg_ticket \
             FROM {TABLE_NAME} \
             GROUP BY customer \
             ORDER BY avg_ticket DESC \
             LIMIT 10"
          ),
        ),
        BenchQuery::new(
          "top_products_by_quantity",
          format!(
            "SELECT product, SUM(quantity) AS units \
             FROM {TABLE_NAME} \
             GROUP BY product \
             ORDER BY units DESC \
             LIMIT 10"
          ),
        ),
      ],
    }
  }

  pub fn from_queries(queries: Vec<BenchQuery>) -> QuerySet {
    QuerySet { queries }
  }

  pub fn iter(&self) -> impl Iterator<Item = &BenchQuery> {
    self.queries.iter()
  }

  pub fn names(&self) -> Vec<&str> {
    self.queries.iter().map(|q| q.name.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.queries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.queries.is_empty()
  }
}

impl Default for QuerySet {
  fn default() -> Self {
    QuerySet::standard()
  }
}

/// Row count of the `sales` table, used to check that an artifact holds what was written.
pub fn count_rows_sql() -> String {
  format!("SELECT COUNT(*) FROM {TABLE_NAME}")
}

use serde::{Serialize, Deserialize};
use crate::core::error::{Error, Result};
use crate::core::types::IndexValue;

/// Named query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DacParameter {
    pub name: String,
    pub value: IndexValue,
}

impl DacParameter {
    pub fn new(name: &str, value: impl Into<IndexValue>) -> Self {
        DacParameter {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// One row of a result set; `None` is a SQL null.
pub type SqlRow = Vec<Option<IndexValue>>;

/// Synchronous connection to the backing store.
///
/// Connection lifetime, transactions and retries belong to the implementor.
pub trait DbClient: Send + Sync {
    fn execute_non_query(&self, sql: &str, params: &[DacParameter]) -> Result<u64>;

    fn execute_scalar(&self, sql: &str, params: &[DacParameter]) -> Result<Option<IndexValue>>;

    /// Streams a single result set row by row.
    fn read_sequentially(
        &self,
        sql: &str,
        params: &[DacParameter],
        on_row: &mut dyn FnMut(&SqlRow) -> Result<()>,
    ) -> Result<()>;

    fn table_exists(&self, name: &str) -> Result<bool>;

    fn column_exists(&self, table_name: &str, column_name: &str) -> Result<bool>;

    /// First column of every row, as strings.
    fn read_strings(&self, sql: &str, params: &[DacParameter]) -> Result<Vec<String>> {
        let mut values = Vec::new();
        self.read_sequentially(sql, params, &mut |row| {
            match row.first() {
                Some(Some(IndexValue::String(s))) => values.push(s.clone()),
                Some(Some(other)) => values.push(other.to_string()),
                Some(None) => {}
                None => return Err(Error::db("Result set has no columns")),
            }
            Ok(())
        })?;
        Ok(values)
    }
}

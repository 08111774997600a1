//! In-memory row store for testing and embedding

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::error::StoreError;
use crate::store::RowCount;

type Row = HashMap<String, String>;

/// In-memory [`RowCount`] implementation
///
/// Useful for testing and for embedding without a database. Uses RwLock for
/// thread-safe access, so one store can back several validators at once.
/// A table nothing was ever inserted into counts zero rows.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, Vec<Row>>>>,
}

impl MemoryStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert one row into a table.
    ///
    /// A row is a set of column/value pairs; give it an `id` column when
    /// the `unique` rule's ignore form should be able to skip it.
    pub fn insert<'a, I>(&self, table: &str, row: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut tables = self.tables.write().map_err(|e| StoreError::Query {
            backend: "memory".to_string(),
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        let rows = tables.entry(table.to_string()).or_default();
        rows.push(
            row.into_iter()
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect(),
        );
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RowCount for MemoryStore {
    fn count(
        &self,
        table: &str,
        column: &str,
        value: &str,
        exclude_id: Option<&str>,
    ) -> Result<u64, StoreError> {
        let tables = self.tables.read().map_err(|e| StoreError::Query {
            backend: "memory".to_string(),
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        let Some(rows) = tables.get(table) else {
            return Ok(0);
        };

        let matched = rows
            .iter()
            .filter(|row| {
                row.get(column).is_some_and(|v| v == value)
                    && exclude_id.is_none_or(|id| row.get("id").map(String::as_str) != Some(id))
            })
            .count();
        Ok(matched as u64)
    }
}

//! Sampled query results.
//!
//! A [`SampleTable`] holds the first rows of a query result. Cells decode from
//! plain JSON values, so a table can be read straight from a JSON document:
//!
//! ```
//! use feature_derivation::{Cell, SampleTable};
//!
//! let table = SampleTable::from_json(r#"{
//!     "columns": ["age", "tags", "city"],
//!     "rows": [[31, "1,2,3", "beijing"], [null, "4,5,6", "shanghai"]]
//! }"#).unwrap();
//! assert_eq!(table.num_rows(), 2);
//! assert_eq!(table.rows()[1][0], Cell::Null);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DerivationError, Result};

/// One cell of a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// SQL `NULL`.
    Null,
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string, possibly encoding a CSV or KV list.
    Text(String),
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Null, Into::into)
    }
}

/// Named columns and their sampled rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SampleTableRecord")]
pub struct SampleTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl SampleTable {
    /// Creates a table, checking that names are unique and rows are complete.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(DerivationError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DerivationError::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Decodes a table from `{"columns": [...], "rows": [[...], ...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: SampleTableRecord = serde_json::from_str(json)?;
        Self::new(record.columns, record.rows)
    }

    /// Returns the column names in result order.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the sampled rows, each with one cell per column.
    #[inline]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Returns the number of sampled rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Iterates over the cells of column `index`, at most `limit` of them.
    ///
    /// Returns `None` when `index` is not a column of this table.
    pub fn column_cells(
        &self,
        index: usize,
        limit: usize,
    ) -> Option<impl Iterator<Item = &Cell>> {
        if index >= self.columns.len() {
            return None;
        }
        Some(self.rows.iter().take(limit).filter_map(move |row| row.get(index)))
    }
}

#[derive(Debug, Deserialize)]
struct SampleTableRecord {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl TryFrom<SampleTableRecord> for SampleTable {
    type Error = DerivationError;

    fn try_from(record: SampleTableRecord) -> Result<Self> {
        SampleTable::new(record.columns, record.rows)
    }
}

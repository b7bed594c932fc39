//! Typed columnar table.
//!
//! A `Table` is an ordered sequence of named columns of uniform declared
//! type, all the same length. The reserved `document.id` column (positive,
//! 1-based index into the original document sequence) exists from
//! construction and is never dropped by the verbs; writing to it is a hard
//! error. Column names are unique; appending under an existing name
//! overwrites that column in place (last-write-wins).

use crate::error::TblError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the reserved document identity column
pub const DOCUMENT_ID: &str = "document.id";

/// Declared type of a column's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Logical,
    Integer,
}

/// One nullable scalar cell. Missing values are explicit `Null` cells,
/// never a sentinel inside another variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Logical(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl Cell {
    /// Convert to a JSON value for row output
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Logical(b) => Value::Bool(*b),
            Cell::Integer(i) => Value::Number((*i).into()),
            Cell::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::String(s) => Value::String(s.clone()),
        }
    }
}

/// A named column of cells with a declared type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub cells: Vec<Cell>,
}

/// An ordered collection of equally-long named columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table of `n` rows holding only the reserved `document.id`
    /// column, numbered 1..=n
    pub fn with_document_ids(n: usize) -> Self {
        let cells = (1..=n as i64).map(Cell::Integer).collect();
        Table {
            columns: vec![Column {
                name: DOCUMENT_ID.to_string(),
                ty: ColumnType::Integer,
                cells,
            }],
        }
    }

    /// Row count
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Build a new table containing the rows at `indices`, in that order.
    /// Indices may repeat (row replication) and may omit rows (row drop);
    /// every column is carried over.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                ty: col.ty,
                cells: indices.iter().map(|&i| col.cells[i].clone()).collect(),
            })
            .collect();
        Table { columns }
    }

    /// Append a column, or overwrite an existing column of the same name in
    /// place. The reserved identity column cannot be written, and the cell
    /// count must match the row count.
    pub fn set_column(
        &mut self,
        name: &str,
        ty: ColumnType,
        cells: Vec<Cell>,
    ) -> Result<(), TblError> {
        if name == DOCUMENT_ID {
            return Err(TblError::ReservedColumn(name.to_string()));
        }
        if cells.len() != self.len() {
            return Err(TblError::LengthMismatch {
                rows: self.len(),
                values: cells.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => {
                col.ty = ty;
                col.cells = cells;
            }
            None => self.columns.push(Column {
                name: name.to_string(),
                ty,
                cells,
            }),
        }
        Ok(())
    }

    /// Emit one JSON object per row, keyed by column name, for downstream
    /// consumers
    pub fn to_json_rows(&self) -> Vec<Map<String, Value>> {
        (0..self.len())
            .map(|i| {
                self.columns
                    .iter()
                    .map(|col| (col.name.clone(), col.cells[i].to_json()))
                    .collect()
            })
            .collect()
    }
}

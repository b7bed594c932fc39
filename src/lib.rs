//! # tabjson - Tidy tables out of ragged JSON
//!
//! A verb grammar for converting arbitrarily nested, irregular JSON
//! documents into tidy tabular data, one explicit transformation step at a
//! time. Every pipeline value is a [`TblJson`]: a typed table paired with
//! one JSON value ("attachment") per row. Structural verbs stack arrays and
//! objects into rows; extraction verbs spread scalar values into columns.
//!
//! ## Quick Start
//!
//! ```rust
//! use tabjson::{jnumber, TblJson};
//!
//! # fn main() -> anyhow::Result<()> {
//! let docs = [r#"{"name": "bob", "purchases": [{"price": 10}, {"price": 3}]}"#];
//!
//! let table = TblJson::read_json(docs)?
//!     .enter_object("purchases")
//!     .gather_array()?
//!     .spread_values([("price", jnumber(["price"]))])?
//!     .into_table();
//!
//! // document.id | array.index | price
//! //           1 |           1 |    10
//! //           1 |           2 |     3
//! assert_eq!(table.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Raggedness
//!
//! Heterogeneous document shapes never abort a pipeline. Structural verbs
//! drop rows whose attachment cannot be traversed (empty array, null,
//! wrong kind); extraction verbs write null cells on a per-row miss. Hard
//! errors ([`TblError`]) are reserved for invalid calls: writing the
//! reserved `document.id` column, an empty path descriptor, or a
//! misaligned (table, attachment) pair.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::BufRead;

pub mod error;
pub mod json;
pub mod path;
pub mod table;
pub mod tbl;
pub mod verbs;

// Re-export the pipeline surface for convenience
pub use error::TblError;
pub use json::{json_length, JsonType};
pub use path::{jlogical, jnumber, jstring, PathSpec, PathStep, ScalarKind};
pub use table::{Cell, Column, ColumnType, Table, DOCUMENT_ID};
pub use tbl::TblJson;

/// Read newline-delimited JSON into a `TblJson`, one document per row.
/// Blank lines are skipped.
pub fn read_ndjson<R: BufRead>(reader: R) -> Result<TblJson> {
    let mut values = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).context("Failed to parse JSON")?;
        values.push(value);
    }
    Ok(TblJson::from_values(values))
}

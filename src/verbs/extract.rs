//! Extraction verbs: read the attachment, write columns.
//!
//! None of these change the row count or the attachment, so re-running one
//! under a new name only adds a column and re-running it under the same
//! name overwrites that column in place. Per-row extraction failure writes
//! a null cell; the only hard errors are invalid column names and empty
//! path descriptors.

use crate::error::TblError;
use crate::json::{json_length, JsonType};
use crate::path::{PathSpec, ScalarKind};
use crate::table::{Cell, ColumnType};
use crate::tbl::TblJson;

/// Default column written by `json_types`
pub const TYPE: &str = "type";

/// Default column written by `json_lengths`
pub const LENGTH: &str = "length";

impl TblJson {
    /// Classify each row's attachment into the `type` column, one of
    /// `object, array, string, number, logical, null`
    pub fn json_types(self) -> Result<TblJson, TblError> {
        self.json_types_as(TYPE)
    }

    /// `json_types` with a caller-chosen column name
    pub fn json_types_as(self, column: &str) -> Result<TblJson, TblError> {
        let (mut table, attachment) = self.into_parts();
        let cells = attachment
            .iter()
            .map(|v| Cell::String(JsonType::of(v).as_str().to_string()))
            .collect();
        table.set_column(column, ColumnType::String, cells)?;
        Ok(TblJson::from_parts(table, attachment))
    }

    /// Write each attachment's length into the `length` column: entry or
    /// element count for objects and arrays, 1 for scalars and null
    pub fn json_lengths(self) -> Result<TblJson, TblError> {
        self.json_lengths_as(LENGTH)
    }

    /// `json_lengths` with a caller-chosen column name
    pub fn json_lengths_as(self, column: &str) -> Result<TblJson, TblError> {
        let (mut table, attachment) = self.into_parts();
        let cells = attachment
            .iter()
            .map(|v| Cell::Integer(json_length(v) as i64))
            .collect();
        table.set_column(column, ColumnType::Integer, cells)?;
        Ok(TblJson::from_parts(table, attachment))
    }

    /// Spread values reached by path descriptors into named columns, one
    /// column per `(name, descriptor)` pair in order. Each pair resolves
    /// against the same unmodified attachment; a row where resolution
    /// fails (missing key, out-of-range index, kind mismatch, container
    /// terminal) gets a null cell in that pair's column.
    pub fn spread_values<S: Into<String>>(
        self,
        specs: impl IntoIterator<Item = (S, PathSpec)>,
    ) -> Result<TblJson, TblError> {
        let (mut table, attachment) = self.into_parts();
        for (name, spec) in specs {
            let name = name.into();
            if spec.is_empty() {
                return Err(TblError::EmptyPath(name));
            }
            let cells = attachment
                .iter()
                .map(|v| spec.resolve(v).unwrap_or(Cell::Null))
                .collect();
            table.set_column(&name, spec.kind().column_type(), cells)?;
        }
        Ok(TblJson::from_parts(table, attachment))
    }

    /// Copy the attachment itself into the `string` column where it is a
    /// JSON string, null elsewhere. Used after a gather verb has positioned
    /// the attachment at the wanted value, so no path is needed.
    pub fn append_values_string(self) -> Result<TblJson, TblError> {
        self.append_values_as(ScalarKind::String, ScalarKind::String.default_column())
    }

    pub fn append_values_string_as(self, column: &str) -> Result<TblJson, TblError> {
        self.append_values_as(ScalarKind::String, column)
    }

    /// Copy the attachment into the `number` column where it is a JSON
    /// number, null elsewhere
    pub fn append_values_number(self) -> Result<TblJson, TblError> {
        self.append_values_as(ScalarKind::Number, ScalarKind::Number.default_column())
    }

    pub fn append_values_number_as(self, column: &str) -> Result<TblJson, TblError> {
        self.append_values_as(ScalarKind::Number, column)
    }

    /// Copy the attachment into the `logical` column where it is a JSON
    /// boolean, null elsewhere
    pub fn append_values_logical(self) -> Result<TblJson, TblError> {
        self.append_values_as(ScalarKind::Logical, ScalarKind::Logical.default_column())
    }

    pub fn append_values_logical_as(self, column: &str) -> Result<TblJson, TblError> {
        self.append_values_as(ScalarKind::Logical, column)
    }

    fn append_values_as(self, kind: ScalarKind, column: &str) -> Result<TblJson, TblError> {
        let (mut table, attachment) = self.into_parts();
        let cells = attachment
            .iter()
            .map(|v| kind.extract(v).unwrap_or(Cell::Null))
            .collect();
        table.set_column(column, kind.column_type(), cells)?;
        Ok(TblJson::from_parts(table, attachment))
    }
}

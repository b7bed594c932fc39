//! The (table, JSON-attachment) pair at the center of every pipeline.
//!
//! A `TblJson` couples a typed table of n rows with a parallel sequence of
//! n JSON values; row i of the table corresponds to attachment i. Every
//! verb consumes a `TblJson` and returns a new one holding that same
//! alignment, so the invariant is checked at each construction site and a
//! violation is a hard error, not a data condition.

use crate::error::TblError;
use crate::table::{Cell, ColumnType, Table};
use serde_json::Value;

/// A typed table paired with one JSON value per row
#[derive(Debug, Clone, PartialEq)]
pub struct TblJson {
    table: Table,
    attachment: Vec<Value>,
}

impl TblJson {
    /// Pair an existing table with an attachment sequence. Misaligned
    /// lengths indicate a bug in collaborator code and fail fast.
    pub fn new(table: Table, attachment: Vec<Value>) -> Result<Self, TblError> {
        if table.len() != attachment.len() {
            return Err(TblError::LengthMismatch {
                rows: table.len(),
                values: attachment.len(),
            });
        }
        Ok(TblJson { table, attachment })
    }

    /// Parse a sequence of JSON document strings into a `TblJson` whose
    /// rows carry `document.id` 1..=n and whose attachments are the parsed
    /// document roots. The first malformed document aborts with a
    /// document-level parse error.
    pub fn read_json<S: AsRef<str>>(
        docs: impl IntoIterator<Item = S>,
    ) -> Result<Self, TblError> {
        let mut attachment = Vec::new();
        for (i, doc) in docs.into_iter().enumerate() {
            let value = serde_json::from_str(doc.as_ref())
                .map_err(|source| TblError::Parse { index: i + 1, source })?;
            attachment.push(value);
        }
        Ok(Self::from_values(attachment))
    }

    /// Adopt already-parsed JSON values, one document per row
    pub fn from_values(values: Vec<Value>) -> Self {
        let table = Table::with_document_ids(values.len());
        TblJson {
            table,
            attachment: values,
        }
    }

    /// Attach JSON parsed from one string-typed column of an existing
    /// table. The table's other columns are kept as-is; a `Null` cell in
    /// the JSON column becomes a JSON `null` attachment.
    pub fn from_table(table: Table, json_column: &str) -> Result<Self, TblError> {
        let column = table
            .column(json_column)
            .ok_or_else(|| TblError::MissingColumn(json_column.to_string()))?;
        if column.ty != ColumnType::String {
            return Err(TblError::NotStringColumn(json_column.to_string()));
        }

        let mut attachment = Vec::with_capacity(column.cells.len());
        for (i, cell) in column.cells.iter().enumerate() {
            let value = match cell {
                Cell::String(text) => serde_json::from_str(text)
                    .map_err(|source| TblError::Parse { index: i + 1, source })?,
                _ => Value::Null,
            };
            attachment.push(value);
        }
        Ok(TblJson { table, attachment })
    }

    /// The tabular half of the pair
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The JSON value attached to each row, in row order
    pub fn attachment(&self) -> &[Value] {
        &self.attachment
    }

    /// Row count (equal to the attachment count by invariant)
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Terminal step: discard the JSON attachment, reverting to a plain
    /// table for downstream tabular collaborators
    pub fn into_table(self) -> Table {
        self.table
    }

    pub(crate) fn into_parts(self) -> (Table, Vec<Value>) {
        (self.table, self.attachment)
    }

    /// Internal constructor for verb outputs; alignment is guaranteed by
    /// construction in the verbs
    pub(crate) fn from_parts(table: Table, attachment: Vec<Value>) -> Self {
        debug_assert_eq!(table.len(), attachment.len());
        TblJson { table, attachment }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DOCUMENT_ID;
    use serde_json::json;

    #[test]
    fn test_read_json_numbers_documents() {
        let tbl = TblJson::read_json(["{\"a\": 1}", "[1, 2]", "null"]).unwrap();
        assert_eq!(tbl.len(), 3);
        assert_eq!(
            tbl.table().column(DOCUMENT_ID).unwrap().cells,
            vec![Cell::Integer(1), Cell::Integer(2), Cell::Integer(3)]
        );
        assert_eq!(tbl.attachment()[0], json!({"a": 1}));
        assert_eq!(tbl.attachment()[2], json!(null));
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let err = TblJson::read_json(["{\"a\": 1}", "{not json"]).unwrap_err();
        match err {
            TblError::Parse { index, .. } => assert_eq!(index, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_new_rejects_misaligned_pair() {
        let table = Table::with_document_ids(2);
        let err = TblJson::new(table, vec![json!(1)]).unwrap_err();
        assert!(matches!(
            err,
            TblError::LengthMismatch { rows: 2, values: 1 }
        ));
    }

    #[test]
    fn test_from_table_attaches_json_column() {
        let mut table = Table::with_document_ids(2);
        table
            .set_column(
                "payload",
                ColumnType::String,
                vec![
                    Cell::String("{\"x\": 1}".into()),
                    Cell::String("[true]".into()),
                ],
            )
            .unwrap();

        let tbl = TblJson::from_table(table, "payload").unwrap();
        assert_eq!(tbl.len(), 2);
        assert_eq!(tbl.attachment()[0], json!({"x": 1}));
        assert_eq!(tbl.attachment()[1], json!([true]));
        // Source columns survive
        assert!(tbl.table().column("payload").is_some());
    }

    #[test]
    fn test_from_table_null_cell_becomes_json_null() {
        let mut table = Table::with_document_ids(1);
        table
            .set_column("payload", ColumnType::String, vec![Cell::Null])
            .unwrap();
        let tbl = TblJson::from_table(table, "payload").unwrap();
        assert_eq!(tbl.attachment()[0], json!(null));
    }

    #[test]
    fn test_from_table_rejects_bad_column() {
        let table = Table::with_document_ids(1);
        assert!(matches!(
            TblJson::from_table(table.clone(), "nope").unwrap_err(),
            TblError::MissingColumn(_)
        ));
        assert!(matches!(
            TblJson::from_table(table, DOCUMENT_ID).unwrap_err(),
            TblError::NotStringColumn(_)
        ));
    }
}

//! Structural verbs: array/object traversal that stacks rows.
//!
//! All three verbs share the same soft-failure policy: a row whose
//! attachment cannot be traversed as required (null, empty container,
//! scalar, or the wrong container kind) contributes zero output rows. That
//! drop policy, not error handling in user pipelines, is how ragged data
//! across heterogeneous documents is tolerated.

use crate::error::TblError;
use crate::table::{Cell, ColumnType};
use crate::tbl::TblJson;
use serde_json::Value;

/// Default ordinal column written by `gather_array`
pub const ARRAY_INDEX: &str = "array.index";

/// Default key column written by `gather_keys`
pub const KEY: &str = "key";

impl TblJson {
    /// Stack array elements into rows, writing the 1-based position into
    /// the `array.index` column
    pub fn gather_array(self) -> Result<TblJson, TblError> {
        self.gather_array_as(ARRAY_INDEX)
    }

    /// `gather_array` with a caller-chosen ordinal column name. A row whose
    /// attachment is a non-empty array of length k becomes k rows, replica
    /// j carrying ordinal j and the array's j-th element as its attachment;
    /// every other attachment shape is dropped. Output order is stable by
    /// source row, then ordinal ascending.
    pub fn gather_array_as(self, column: &str) -> Result<TblJson, TblError> {
        let (table, attachment) = self.into_parts();

        let mut sources = Vec::new();
        let mut ordinals = Vec::new();
        let mut gathered = Vec::new();
        for (row, value) in attachment.into_iter().enumerate() {
            if let Value::Array(elements) = value {
                for (j, element) in elements.into_iter().enumerate() {
                    sources.push(row);
                    ordinals.push(Cell::Integer(j as i64 + 1));
                    gathered.push(element);
                }
            }
        }

        let mut table = table.take_rows(&sources);
        table.set_column(column, ColumnType::Integer, ordinals)?;
        Ok(TblJson::from_parts(table, gathered))
    }

    /// Stack object members into rows, writing each member's key into the
    /// `key` column
    pub fn gather_keys(self) -> Result<TblJson, TblError> {
        self.gather_keys_as(KEY)
    }

    /// `gather_keys` with a caller-chosen key column name. A row whose
    /// attachment is a non-empty object becomes one row per member in key
    /// insertion order, each carrying the key and that member's value as
    /// its attachment; every other attachment shape is dropped.
    pub fn gather_keys_as(self, column: &str) -> Result<TblJson, TblError> {
        let (table, attachment) = self.into_parts();

        let mut sources = Vec::new();
        let mut keys = Vec::new();
        let mut gathered = Vec::new();
        for (row, value) in attachment.into_iter().enumerate() {
            if let Value::Object(members) = value {
                for (key, member) in members.into_iter() {
                    sources.push(row);
                    keys.push(Cell::String(key));
                    gathered.push(member);
                }
            }
        }

        let mut table = table.take_rows(&sources);
        table.set_column(column, ColumnType::String, keys)?;
        Ok(TblJson::from_parts(table, gathered))
    }

    /// Descend into one object member. A row whose attachment is an object
    /// containing `key` survives with its attachment replaced by the value
    /// at `key`; any other row is dropped. Never duplicates rows.
    pub fn enter_object(self, key: &str) -> TblJson {
        let (table, attachment) = self.into_parts();

        let mut sources = Vec::new();
        let mut entered = Vec::new();
        for (row, value) in attachment.into_iter().enumerate() {
            if let Value::Object(mut members) = value {
                if let Some(member) = members.shift_remove(key) {
                    sources.push(row);
                    entered.push(member);
                }
            }
        }

        TblJson::from_parts(table.take_rows(&sources), entered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DOCUMENT_ID;
    use serde_json::json;

    #[test]
    fn test_gather_array_replicates_rows() {
        let tbl = TblJson::from_values(vec![json!([1, 2, 3])])
            .gather_array()
            .unwrap();

        assert_eq!(tbl.len(), 3);
        assert_eq!(tbl.table().len(), tbl.attachment().len());
        assert_eq!(
            tbl.table().column(ARRAY_INDEX).unwrap().cells,
            vec![Cell::Integer(1), Cell::Integer(2), Cell::Integer(3)]
        );
        assert_eq!(tbl.attachment(), &[json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_gather_array_drops_empty_null_and_scalars() {
        let tbl = TblJson::from_values(vec![
            json!([]),
            json!(null),
            json!("scalar"),
            json!({"an": "object"}),
            json!([10]),
        ])
        .gather_array()
        .unwrap();

        // Only the last document contributes a row
        assert_eq!(tbl.len(), 1);
        assert_eq!(
            tbl.table().column(DOCUMENT_ID).unwrap().cells,
            vec![Cell::Integer(5)]
        );
        assert_eq!(tbl.attachment(), &[json!(10)]);
    }

    #[test]
    fn test_gather_array_order_is_row_then_ordinal() {
        let tbl = TblJson::from_values(vec![json!(["a", "b"]), json!(["c"])])
            .gather_array()
            .unwrap();

        assert_eq!(
            tbl.table().column(DOCUMENT_ID).unwrap().cells,
            vec![Cell::Integer(1), Cell::Integer(1), Cell::Integer(2)]
        );
        assert_eq!(
            tbl.table().column(ARRAY_INDEX).unwrap().cells,
            vec![Cell::Integer(1), Cell::Integer(2), Cell::Integer(1)]
        );
    }

    #[test]
    fn test_gather_keys_stacks_members_in_insertion_order() {
        let tbl = TblJson::from_values(vec![json!({"a": 1, "b": 2})])
            .gather_keys()
            .unwrap();

        assert_eq!(tbl.len(), 2);
        assert_eq!(
            tbl.table().column(KEY).unwrap().cells,
            vec![Cell::String("a".into()), Cell::String("b".into())]
        );
        assert_eq!(tbl.attachment(), &[json!(1), json!(2)]);
    }

    #[test]
    fn test_gather_keys_drops_non_objects() {
        let tbl = TblJson::from_values(vec![
            json!({}),
            json!(null),
            json!([1, 2]),
            json!(7),
            json!({"k": true}),
        ])
        .gather_keys()
        .unwrap();

        assert_eq!(tbl.len(), 1);
        assert_eq!(tbl.attachment(), &[json!(true)]);
    }

    #[test]
    fn test_enter_object_keeps_only_matching_rows() {
        let tbl = TblJson::from_values(vec![json!([{"x": 1}, {"y": 2}])])
            .gather_array()
            .unwrap()
            .enter_object("x");

        assert_eq!(tbl.len(), 1);
        assert_eq!(tbl.attachment(), &[json!(1)]);
    }

    #[test]
    fn test_enter_object_drops_non_object_attachments() {
        let tbl = TblJson::from_values(vec![json!("scalar"), json!(null), json!({"k": 1})])
            .enter_object("k");

        assert_eq!(tbl.len(), 1);
        assert_eq!(
            tbl.table().column(DOCUMENT_ID).unwrap().cells,
            vec![Cell::Integer(3)]
        );
    }

    #[test]
    fn test_gather_cannot_write_the_identity_column() {
        let err = TblJson::from_values(vec![json!([1])])
            .gather_array_as(DOCUMENT_ID)
            .unwrap_err();
        assert!(matches!(err, TblError::ReservedColumn(_)));
    }
}

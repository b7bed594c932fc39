//! Declarative path descriptors for pulling scalars out of nested JSON.
//!
//! A `PathSpec` names a key/index path plus the scalar kind expected at the
//! end of it. Descriptors are plain data built at pipeline-construction
//! time and consumed by `spread_values`; resolution failure of any sort
//! (missing key, out-of-range index, wrong terminal kind, container at the
//! end of the path) is a soft miss producing a null cell, never an error.

use crate::table::{Cell, ColumnType};
use serde_json::Value;

/// One step of a path: an object key or a 1-based array index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

/// Expected kind of the scalar at the end of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    Logical,
}

impl ScalarKind {
    pub fn column_type(self) -> ColumnType {
        match self {
            ScalarKind::String => ColumnType::String,
            ScalarKind::Number => ColumnType::Number,
            ScalarKind::Logical => ColumnType::Logical,
        }
    }

    /// Default column name used by the `append_values_*` verbs
    pub fn default_column(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
            ScalarKind::Logical => "logical",
        }
    }

    /// Extract a cell from `value` iff it is a scalar of exactly this kind
    pub fn extract(self, value: &Value) -> Option<Cell> {
        match (self, value) {
            (ScalarKind::String, Value::String(s)) => Some(Cell::String(s.clone())),
            (ScalarKind::Number, Value::Number(n)) => n.as_f64().map(Cell::Number),
            (ScalarKind::Logical, Value::Bool(b)) => Some(Cell::Logical(*b)),
            _ => None,
        }
    }
}

/// A key/index path plus the scalar kind expected at its end
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    kind: ScalarKind,
    steps: Vec<PathStep>,
}

/// Descriptor for a string value at `path`
pub fn jstring<P: Into<PathStep>>(path: impl IntoIterator<Item = P>) -> PathSpec {
    PathSpec::new(ScalarKind::String, path)
}

/// Descriptor for a numeric value at `path`
pub fn jnumber<P: Into<PathStep>>(path: impl IntoIterator<Item = P>) -> PathSpec {
    PathSpec::new(ScalarKind::Number, path)
}

/// Descriptor for a boolean value at `path`
pub fn jlogical<P: Into<PathStep>>(path: impl IntoIterator<Item = P>) -> PathSpec {
    PathSpec::new(ScalarKind::Logical, path)
}

impl PathSpec {
    pub fn new<P: Into<PathStep>>(kind: ScalarKind, path: impl IntoIterator<Item = P>) -> Self {
        PathSpec {
            kind,
            steps: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one step; allows mixing keys and indices in one path:
    /// `jnumber(["items"]).step(2).step("price")`
    pub fn step(mut self, step: impl Into<PathStep>) -> Self {
        self.steps.push(step.into());
        self
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Walk `value` along the path and return the matched scalar cell, or
    /// `None` on any failure along the way
    pub fn resolve(&self, value: &Value) -> Option<Cell> {
        let mut current = value;
        for step in &self.steps {
            current = match (current, step) {
                (Value::Object(obj), PathStep::Key(key)) => obj.get(key)?,
                (Value::Array(arr), PathStep::Index(index)) => {
                    // 1-based
                    if *index == 0 {
                        return None;
                    }
                    arr.get(index - 1)?
                }
                _ => return None,
            };
        }
        self.kind.extract(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_path_resolves() {
        let value = json!({"a": {"b": 10}});
        assert_eq!(
            jnumber(["a", "b"]).resolve(&value),
            Some(Cell::Number(10.0))
        );
    }

    #[test]
    fn test_missing_key_is_soft_miss() {
        let value = json!({"y": 1});
        assert_eq!(jnumber(["x"]).resolve(&value), None);
    }

    #[test]
    fn test_kind_must_match_exactly() {
        let value = json!({"x": "10"});
        assert_eq!(jnumber(["x"]).resolve(&value), None);
        assert_eq!(
            jstring(["x"]).resolve(&value),
            Some(Cell::String("10".into()))
        );
    }

    #[test]
    fn test_container_terminal_is_soft_miss() {
        let value = json!({"x": {"nested": 1}});
        assert_eq!(jnumber(["x"]).resolve(&value), None);
        assert_eq!(jstring(["x"]).resolve(&value), None);
    }

    #[test]
    fn test_one_based_index_steps() {
        let value = json!({"items": [{"price": 5}, {"price": 7}]});
        let spec = jnumber(["items"]).step(2_usize).step("price");
        assert_eq!(spec.resolve(&value), Some(Cell::Number(7.0)));

        let out_of_range = jnumber(["items"]).step(3_usize).step("price");
        assert_eq!(out_of_range.resolve(&value), None);

        let zero = jnumber(["items"]).step(0_usize).step("price");
        assert_eq!(zero.resolve(&value), None);
    }

    #[test]
    fn test_logical_descriptor() {
        let value = json!({"active": true});
        assert_eq!(
            jlogical(["active"]).resolve(&value),
            Some(Cell::Logical(true))
        );
        assert_eq!(jlogical(["missing"]).resolve(&value), None);
    }
}

//! Hard failures of the flattening engine.
//!
//! Ragged data never produces these: a type mismatch, missing key,
//! out-of-range index, or empty container is handled per row (drop the row
//! or write a null cell). `TblError` is reserved for genuinely invalid
//! calls, which indicate a bug in collaborator code and fail fast.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TblError {
    /// Attempt to write the reserved document identity column
    #[error("column `{0}` collides with the reserved document.id column")]
    ReservedColumn(String),

    /// A spread descriptor with no path steps
    #[error("path descriptor for column `{0}` has an empty path")]
    EmptyPath(String),

    /// The (table, attachment) pair is misaligned
    #[error("table has {rows} rows but {values} attached JSON values")]
    LengthMismatch { rows: usize, values: usize },

    /// Named column does not exist in the source table
    #[error("column `{0}` not found")]
    MissingColumn(String),

    /// The named JSON source column is not a string column
    #[error("column `{0}` is not a string column")]
    NotStringColumn(String),

    /// A document failed JSON parsing (1-based document index)
    #[error("invalid JSON in document {index}: {source}")]
    Parse {
        index: usize,
        source: serde_json::Error,
    },
}

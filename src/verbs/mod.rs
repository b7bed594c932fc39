//! The verb algebra over `TblJson` pipelines.
//!
//! Structural verbs (`gather_array`, `gather_keys`, `enter_object`) change
//! which rows exist and which JSON subtree each row's attachment points to.
//! Extraction verbs (`spread_values`, `append_values_*`, `json_types`,
//! `json_lengths`) read the attachment and write columns without touching
//! rows or attachment. Every verb consumes its input and returns a fresh,
//! aligned pair.

pub mod extract;
pub mod structural;

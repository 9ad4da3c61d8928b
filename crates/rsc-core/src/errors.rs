//! Cross-cutting error types.
//!
//! Storage, sync and portal errors live in their own crates and wrap
//! `CoreError` where domain validation is involved.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Input failed validation (empty identity fields, unsafe path segments).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A label could not be mapped to a known value.
    #[error("Unknown {kind}: '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

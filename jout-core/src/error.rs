//! Error types for jout

use thiserror::Error;

/// jout error types
#[derive(Debug, Error)]
pub enum JoutError {
    /// A configured output field does not exist in the input row schema.
    #[error("Field not found in input schema: {0}")]
    FieldNotFound(String),
    /// A configured group key field does not exist in the input row schema.
    #[error("Group key field not found in input schema: {0}")]
    KeyFieldNotFound(String),
    /// Value emission is enabled but no output value field name was given.
    #[error("Missing output value field name")]
    MissingOutputField,
    /// File writing is enabled but no chunk sink was supplied.
    #[error("Missing target sink for file output")]
    MissingTargetSink,
    /// Configuration is inconsistent or incomplete.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// A row cell does not match the kind its schema declares.
    #[error("Type mismatch for field '{field}': expected {expected}")]
    TypeMismatch {
        /// Field name as declared in the schema.
        field: String,
        /// The declared kind the value failed to match.
        expected: String,
    },
    /// A row has a different arity than the resolved schema.
    #[error("Row arity {got} does not match schema arity {expected}")]
    ArityMismatch {
        /// Number of values in the offending row.
        got: usize,
        /// Number of fields the schema declares.
        expected: usize,
    },
    /// A decimal literal could not be parsed exactly.
    #[error("Invalid decimal literal: {0}")]
    InvalidDecimal(String),
    /// I/O operation failed while writing a chunk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Internal invariant was violated.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, JoutError>;

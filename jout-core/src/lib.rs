//! jout core - primitives for row-to-JSON document assembly
//!
//! This crate provides the fundamental types for jout with no I/O
//! dependencies. It includes:
//!
//! - Typed row values and declared field kinds
//! - Row schemas with resolved-once positional lookup
//! - Arbitrary-precision decimals
//! - The output configuration surface
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod decimal;
pub mod error;
pub mod schema;
pub mod value;

// Re-export commonly used types
pub use config::{
    Encoding, FieldSpec, GenerationMode, KeyFieldSpec, OperationMode, OutputConfig,
};
pub use decimal::Decimal;
pub use error::{JoutError, Result};
pub use schema::{FieldMeta, Row, RowSchema};
pub use value::{RowValue, ValueKind};

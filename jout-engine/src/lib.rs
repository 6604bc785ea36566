//! jout engine - streaming row-to-document aggregation
//!
//! This crate provides the aggregation engine for jout:
//!
//! - Field projection into typed JSON leaves
//! - Group-change detection over key fields
//! - Document accumulation with stream-wide row numbering
//! - Chunk serialization (wrapping, collapsing, pretty/compact)
//! - Pagination annotation (size, page start, page end)
//! - Output routing to row and chunk sinks
//!
//! The engine is single-threaded and single-pass: one open chunk at a time,
//! one physical flush per logical boundary.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod accumulator;
pub mod engine;
pub mod group;
pub mod paginate;
pub mod projector;
pub mod router;
pub mod serializer;

// Re-export commonly used types
pub use jout_core::{
    Encoding, FieldSpec, GenerationMode, JoutError, KeyFieldSpec, OperationMode, OutputConfig,
    Result, Row, RowSchema, RowValue, ValueKind,
};

pub use accumulator::{DocumentAccumulator, DocumentNode};
pub use engine::{DocumentEngine, EngineSummary};
pub use group::{GroupTracker, KeyValues};
pub use paginate::{PaginationRecord, Paginator};
pub use projector::{project, Projection};
pub use router::{ChunkSink, OutputRouter, RowSink};
pub use serializer::{serialize_chunk, SerializedChunk};

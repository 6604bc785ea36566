//! Chunk serialization
//!
//! Renders the accumulated items into the final JSON text: optional wrapping
//! block, singleton-array collapsing, pretty or compact. Deterministic byte
//! for byte: the same items and config always render identically.

use jout_core::{JoutError, OutputConfig, Result};
use serde_json::{Map, Value};

use crate::accumulator::DocumentNode;

/// Serialized chunk text with its encoded byte length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedChunk {
    /// The rendered JSON document
    pub text: String,
    /// Length of `text` in the configured output encoding
    pub byte_len: usize,
}

/// Serialize the items of one chunk
///
/// Callers must short-circuit empty chunks; serializing nothing is an
/// internal error, never an empty document.
pub fn serialize_chunk(items: &[DocumentNode], config: &OutputConfig) -> Result<SerializedChunk> {
    if items.is_empty() {
        return Err(JoutError::Internal(
            "attempted to serialize an empty chunk".to_string(),
        ));
    }

    // A singleton collapses to a bare object unless arrays are forced
    let body = if items.len() == 1 && !config.array_for_single {
        Value::Object(items[0].clone())
    } else {
        Value::Array(items.iter().cloned().map(Value::Object).collect())
    };

    // The wrapper is built directly over the in-memory body; no re-parse
    let document = match &config.block_name {
        Some(block) => {
            let mut wrapper = Map::new();
            wrapper.insert(block.clone(), body);
            Value::Object(wrapper)
        }
        None => body,
    };

    let text = if config.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    let byte_len = config.encoding.encoded_len(&text);

    Ok(SerializedChunk { text, byte_len })
}

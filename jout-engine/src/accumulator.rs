//! Document accumulation
//!
//! Holds the ordered per-row document items of the open chunk, plus the
//! stream-wide row counter. The counter is 1-based and survives `reset()`:
//! chunk boundaries never disturb row numbering.

use serde_json::{Map, Value};

/// One per-row document node: element name → leaf, in declaration order
pub type DocumentNode = Map<String, Value>;

/// Append-only item list for the open chunk
#[derive(Debug, Default)]
pub struct DocumentAccumulator {
    items: Vec<DocumentNode>,
    rows_seen: u64,
}

impl DocumentAccumulator {
    /// Fresh accumulator with an untouched row counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one item and advance the stream-wide row counter
    pub fn append(&mut self, node: DocumentNode) {
        self.items.push(node);
        self.rows_seen += 1;
    }

    /// Discard the open chunk's items; the row counter is untouched
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// True when the open chunk has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item count of the open chunk
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total rows appended across the whole stream (1-based high-water mark)
    pub fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    /// Items of the open chunk, in append order
    pub fn items(&self) -> &[DocumentNode] {
        &self.items
    }
}

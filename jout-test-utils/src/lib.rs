//! Shared fixtures for jout integration tests
//!
//! Schema/row builders plus in-memory sinks that record every open, write,
//! and close so tests can assert the one-physical-flush-per-boundary
//! contract.

use std::sync::{Arc, Mutex};

use jout_core::{FieldMeta, Result, Row, RowSchema, RowValue, ValueKind};
use jout_engine::{ChunkSink, RowSink};

/// Build a schema from `(name, kind)` pairs
pub fn schema_of(fields: &[(&str, ValueKind)]) -> RowSchema {
    RowSchema::new(
        fields
            .iter()
            .map(|(name, kind)| FieldMeta::new(*name, *kind))
            .collect(),
    )
}

/// Text cell
pub fn text(s: &str) -> RowValue {
    RowValue::Text(s.to_string())
}

/// Integer cell
pub fn int(i: i64) -> RowValue {
    RowValue::Int(i)
}

/// Row sink that collects emitted rows in memory
///
/// Clone the sink before boxing it; every clone shares the same storage.
#[derive(Clone, Default)]
pub struct MemoryRowSink {
    rows: Arc<Mutex<Vec<Row>>>,
}

impl MemoryRowSink {
    /// Fresh empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the rows pushed so far
    pub fn rows(&self) -> Vec<Row> {
        self.rows.lock().unwrap().clone()
    }
}

impl RowSink for MemoryRowSink {
    fn push(&mut self, row: Row) -> Result<()> {
        self.rows.lock().unwrap().push(row);
        Ok(())
    }
}

#[derive(Default)]
struct ChunkLog {
    segments: Vec<Vec<u8>>,
    opens: usize,
    closes: usize,
    open: bool,
}

/// Chunk sink that records segments and lifecycle transitions
///
/// `open` starts a new segment unless the sink is already open; `close` on a
/// closed sink is a no-op, matching the engine's teardown contract.
#[derive(Clone, Default)]
pub struct MemoryChunkSink {
    log: Arc<Mutex<ChunkLog>>,
}

impl MemoryChunkSink {
    /// Fresh closed sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments written so far, decoded as UTF-8
    pub fn segments(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .segments
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }

    /// Raw segment bytes
    pub fn segment_bytes(&self) -> Vec<Vec<u8>> {
        self.log.lock().unwrap().segments.clone()
    }

    /// Number of open transitions
    pub fn opens(&self) -> usize {
        self.log.lock().unwrap().opens
    }

    /// Number of close transitions
    pub fn closes(&self) -> usize {
        self.log.lock().unwrap().closes
    }

    /// True while the sink is open
    pub fn is_open(&self) -> bool {
        self.log.lock().unwrap().open
    }
}

impl ChunkSink for MemoryChunkSink {
    fn open(&mut self) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        if !log.open {
            log.open = true;
            log.opens += 1;
            log.segments.push(Vec::new());
        }
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        match log.segments.last_mut() {
            Some(segment) => {
                segment.extend_from_slice(bytes);
                Ok(())
            }
            None => Err(jout_core::JoutError::Internal(
                "write before open".to_string(),
            )),
        }
    }

    fn close(&mut self) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.open {
            log.open = false;
            log.closes += 1;
        }
        Ok(())
    }
}

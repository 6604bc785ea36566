//! Output routing
//!
//! Fans a flushed chunk out to the configured destinations: a downstream row
//! carrying key fields, the serialized value, and the pagination columns,
//! and/or a chunk sink that receives the encoded text. Sink failures are
//! fatal to the run; there is no retry.

use jout_core::{Encoding, Result, Row, RowSchema, RowValue};

use crate::paginate::PaginationRecord;

/// Downstream consumer of emitted rows
pub trait RowSink {
    /// Receive the output row schema, called once at engine setup
    fn bind(&mut self, _schema: &RowSchema) {}
    /// Accept one emitted row; ordering follows the bound schema
    fn push(&mut self, row: Row) -> Result<()>;
}

/// Destination for serialized chunk text
///
/// The engine calls `open` before every write and `close` after it, so one
/// flush maps to one physical segment. Implementations make `open` a no-op
/// when the sink is already open (an eagerly opened sink sees `open` again
/// at first flush).
pub trait ChunkSink {
    /// Open the sink (idempotent)
    fn open(&mut self) -> Result<()>;
    /// Write the full encoded chunk
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    /// Close the sink; a later `open` starts the next segment
    fn close(&mut self) -> Result<()>;
}

/// Routes annotated chunks to the configured outputs
pub struct OutputRouter {
    row_sink: Option<Box<dyn RowSink>>,
    chunk_sink: Option<Box<dyn ChunkSink>>,
    encoding: Encoding,
}

impl OutputRouter {
    /// Build a router; a `None` sink disables that path
    pub fn new(
        row_sink: Option<Box<dyn RowSink>>,
        chunk_sink: Option<Box<dyn ChunkSink>>,
        encoding: Encoding,
    ) -> Self {
        Self {
            row_sink,
            chunk_sink,
            encoding,
        }
    }

    /// Open the chunk sink ahead of the first flush (eager-open mode)
    pub fn open_chunk_sink(&mut self) -> Result<()> {
        if let Some(sink) = &mut self.chunk_sink {
            sink.open()?;
        }
        Ok(())
    }

    /// Close the chunk sink at stream teardown
    pub fn close_chunk_sink(&mut self) -> Result<()> {
        if let Some(sink) = &mut self.chunk_sink {
            sink.close()?;
        }
        Ok(())
    }

    /// Route one flushed chunk to every configured destination
    ///
    /// Row shape: key fields in declared order, the serialized value, then
    /// whichever of size / page-start / page-end are configured, in that
    /// fixed order.
    pub fn route(&mut self, record: &PaginationRecord) -> Result<()> {
        if let Some(sink) = &mut self.row_sink {
            let mut row: Row = record.key_values.iter().cloned().collect();
            row.push(RowValue::Text(record.chunk.text.clone()));
            if let Some(size) = record.size_bytes {
                row.push(RowValue::Int(size as i64));
            }
            if let Some(start) = record.page_start {
                row.push(RowValue::Int(start as i64));
            }
            if let Some(end) = record.page_end {
                row.push(RowValue::Int(end as i64));
            }
            sink.push(row)?;
        }

        if let Some(sink) = &mut self.chunk_sink {
            sink.open()?;
            sink.write(&self.encoding.encode(&record.chunk.text))?;
            sink.close()?;
            tracing::debug!(
                bytes = record.chunk.byte_len,
                "chunk written to sink"
            );
        }

        Ok(())
    }
}

//! Pagination annotation
//!
//! Packages a serialized chunk with its key values and the configured
//! size / page-start / page-end columns. The paginator owns the running
//! "next start" cursor, so consecutive chunks always satisfy
//! `page_start(n + 1) == page_end(n) + 1`.

use jout_core::OutputConfig;

use crate::group::KeyValues;
use crate::serializer::SerializedChunk;

/// One emitted chunk with its pagination metadata
#[derive(Debug, Clone)]
pub struct PaginationRecord {
    /// Key-field values of the chunk, typed, in declared key order
    pub key_values: KeyValues,
    /// The serialized document
    pub chunk: SerializedChunk,
    /// Encoded size in bytes, present when a size column is configured
    pub size_bytes: Option<u64>,
    /// First source row of the chunk (1-based), when configured
    pub page_start: Option<u64>,
    /// Last source row of the chunk (1-based), when configured
    pub page_end: Option<u64>,
}

/// Computes pagination columns across consecutive chunks
#[derive(Debug)]
pub struct Paginator {
    next_start: u64,
}

impl Paginator {
    /// Paginator positioned before row 1
    pub fn new() -> Self {
        Self { next_start: 1 }
    }

    /// Annotate one flushed chunk
    ///
    /// `rows_seen` is the stream-wide row counter after the chunk's last row.
    /// The cursor advances to `rows_seen + 1` regardless of which columns are
    /// configured, so a later chunk's start stays contiguous.
    pub fn annotate(
        &mut self,
        chunk: SerializedChunk,
        key_values: KeyValues,
        rows_seen: u64,
        config: &OutputConfig,
    ) -> PaginationRecord {
        let page_start = self.next_start;
        self.next_start = rows_seen + 1;

        PaginationRecord {
            key_values,
            size_bytes: config.size_field.as_ref().map(|_| chunk.byte_len as u64),
            page_start: config.page_start_field.as_ref().map(|_| page_start),
            page_end: config.page_end_field.as_ref().map(|_| rows_seen),
            chunk,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jout_core::{FieldSpec, OutputConfig};
    use smallvec::smallvec;

    fn chunk(text: &str) -> SerializedChunk {
        SerializedChunk {
            text: text.to_string(),
            byte_len: text.len(),
        }
    }

    fn config_with_pages() -> OutputConfig {
        OutputConfig {
            fields: vec![FieldSpec::named("id")],
            value_field: Some("out".to_string()),
            size_field: Some("size".to_string()),
            page_start_field: Some("start".to_string()),
            page_end_field: Some("end".to_string()),
            ..OutputConfig::default()
        }
    }

    #[test]
    fn test_contiguous_pages() {
        let cfg = config_with_pages();
        let mut paginator = Paginator::new();

        let first = paginator.annotate(chunk("{}"), smallvec![], 3, &cfg);
        assert_eq!(first.page_start, Some(1));
        assert_eq!(first.page_end, Some(3));

        let second = paginator.annotate(chunk("{}"), smallvec![], 5, &cfg);
        assert_eq!(second.page_start, Some(4));
        assert_eq!(second.page_end, Some(5));
    }

    #[test]
    fn test_size_is_encoded_byte_len() {
        let cfg = config_with_pages();
        let mut paginator = Paginator::new();
        let record = paginator.annotate(chunk("0123456789"), smallvec![], 1, &cfg);
        assert_eq!(record.size_bytes, Some(10));
    }

    #[test]
    fn test_unconfigured_columns_are_absent_but_cursor_advances() {
        let cfg = OutputConfig {
            fields: vec![FieldSpec::named("id")],
            value_field: Some("out".to_string()),
            page_start_field: Some("start".to_string()),
            ..OutputConfig::default()
        };
        let mut paginator = Paginator::new();

        let first = paginator.annotate(chunk("{}"), smallvec![], 2, &cfg);
        assert_eq!(first.size_bytes, None);
        assert_eq!(first.page_end, None);
        assert_eq!(first.page_start, Some(1));

        let second = paginator.annotate(chunk("{}"), smallvec![], 6, &cfg);
        assert_eq!(second.page_start, Some(3));
    }
}

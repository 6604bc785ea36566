//! The streaming engine
//!
//! Drives one pass over the row stream: group-change detection before each
//! append, row-count splitting after it, and a single forced flush at end of
//! stream. All mutable state lives on the engine struct; there is exactly
//! one open chunk at any time.

use std::sync::Arc;

use jout_core::{
    FieldMeta, FieldSpec, GenerationMode, JoutError, OutputConfig, Result, Row, RowSchema,
    ValueKind,
};

use crate::accumulator::{DocumentAccumulator, DocumentNode};
use crate::group::GroupTracker;
use crate::paginate::Paginator;
use crate::projector::{project, Projection};
use crate::router::{ChunkSink, OutputRouter, RowSink};
use crate::serializer::serialize_chunk;

/// One output field resolved against the row schema
#[derive(Debug)]
struct ResolvedField {
    spec: FieldSpec,
    index: usize,
    kind: ValueKind,
}

/// Totals reported when the stream ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSummary {
    /// Rows consumed from upstream
    pub rows_in: u64,
    /// Chunks flushed to the outputs
    pub chunks_out: u64,
}

/// Streaming row-to-document engine
///
/// Construction performs every setup-time resolution and validation; a
/// constructed engine accepts rows immediately. `finish` consumes the engine,
/// flushing any open chunk exactly once.
pub struct DocumentEngine {
    config: OutputConfig,
    schema: Arc<RowSchema>,
    fields: Vec<ResolvedField>,
    tracker: GroupTracker,
    accumulator: DocumentAccumulator,
    paginator: Paginator,
    router: OutputRouter,
    output_schema: Option<RowSchema>,
    chunks_out: u64,
}

impl DocumentEngine {
    /// Resolve configuration against the row schema and wire the sinks
    ///
    /// Fails fast on every fatal setup condition: a declared field or key
    /// field missing from the schema (named in the error), a missing output
    /// value field when emitting, or a missing sink for the configured mode.
    pub fn new(
        schema: Arc<RowSchema>,
        config: OutputConfig,
        row_sink: Option<Box<dyn RowSink>>,
        chunk_sink: Option<Box<dyn ChunkSink>>,
    ) -> Result<Self> {
        config.validate()?;

        let mut fields = Vec::with_capacity(config.fields.len());
        for spec in &config.fields {
            let index = schema
                .index_of(&spec.source_field)
                .ok_or_else(|| JoutError::FieldNotFound(spec.source_field.clone()))?;
            let kind = schema.field(index).expect("resolved index").kind;
            if spec.json_fragment && kind != ValueKind::Text {
                return Err(JoutError::InvalidConfig(format!(
                    "field '{}' is declared {} but marked as a JSON fragment",
                    spec.source_field,
                    kind.name()
                )));
            }
            fields.push(ResolvedField {
                spec: spec.clone(),
                index,
                kind,
            });
        }

        let mut key_indexes = Vec::with_capacity(config.key_fields.len());
        for key in &config.key_fields {
            let index = schema
                .index_of(&key.source_field)
                .ok_or_else(|| JoutError::KeyFieldNotFound(key.source_field.clone()))?;
            key_indexes.push(index);
        }

        if config.mode.emits_value() && row_sink.is_none() {
            return Err(JoutError::InvalidConfig(
                "value emission is enabled but no row sink was supplied".to_string(),
            ));
        }
        if config.mode.writes_file() && chunk_sink.is_none() {
            return Err(JoutError::MissingTargetSink);
        }

        let output_schema = if config.mode.emits_value() {
            Some(build_output_schema(&schema, &key_indexes, &config)?)
        } else {
            None
        };

        let mut row_sink = row_sink;
        if let (Some(out), Some(sink)) = (&output_schema, row_sink.as_mut()) {
            sink.bind(out);
        }

        let mut router = OutputRouter::new(row_sink, chunk_sink, config.encoding);
        if config.eager_open && config.mode.writes_file() {
            router.open_chunk_sink()?;
        }

        Ok(Self {
            config,
            schema,
            fields,
            tracker: GroupTracker::new(key_indexes),
            accumulator: DocumentAccumulator::new(),
            paginator: Paginator::new(),
            router,
            output_schema,
            chunks_out: 0,
        })
    }

    /// Schema of the emitted rows, when value emission is configured
    pub fn output_schema(&self) -> Option<&RowSchema> {
        self.output_schema.as_ref()
    }

    /// Consume one row
    ///
    /// Evaluates the group-change predicate before appending and the
    /// row-count predicate after it; both feed the same flush routine.
    pub fn push_row(&mut self, row: &Row) -> Result<()> {
        if row.len() != self.schema.len() {
            return Err(JoutError::ArityMismatch {
                got: row.len(),
                expected: self.schema.len(),
            });
        }

        if self.starts_new_group(row) {
            self.maybe_flush()?;
        }

        let node = self.build_node(row)?;
        self.accumulator.append(node);
        self.tracker.remember(row);

        if self.config.split_after > 0 && self.accumulator.len() >= self.config.split_after {
            self.maybe_flush()?;
        }

        Ok(())
    }

    /// End of stream: flush the open chunk, release the sink, report totals
    pub fn finish(mut self) -> Result<EngineSummary> {
        self.maybe_flush()?;
        // An eagerly opened sink that never saw a flush still gets released
        self.router.close_chunk_sink()?;
        Ok(EngineSummary {
            rows_in: self.accumulator.rows_seen(),
            chunks_out: self.chunks_out,
        })
    }

    /// Group-change predicate, evaluated before the row is appended
    ///
    /// In group-loop mode with zero key fields this preserves the source
    /// behavior of flushing on every row after the first; the tracker itself
    /// treats zero keys as one group.
    fn starts_new_group(&self, row: &Row) -> bool {
        match self.config.generation {
            GenerationMode::Flat => false,
            GenerationMode::GroupLoop => {
                if self.tracker.key_count() == 0 {
                    self.tracker.is_seeded()
                } else {
                    self.tracker.is_new_group(row)
                }
            }
        }
    }

    /// Project every configured field of `row` into a document node
    fn build_node(&self, row: &Row) -> Result<DocumentNode> {
        let mut node = DocumentNode::new();
        for field in &self.fields {
            let value = &row[field.index];
            if !value.matches_kind(field.kind) {
                return Err(JoutError::TypeMismatch {
                    field: field.spec.source_field.clone(),
                    expected: field.kind.name().to_string(),
                });
            }
            match project(value, &field.spec)? {
                Projection::Leaf(leaf) => {
                    node.insert(field.spec.element_name.clone(), leaf);
                }
                Projection::Absent => {}
            }
        }
        Ok(node)
    }

    /// Serialize, annotate, route, and reset the open chunk, if any
    fn maybe_flush(&mut self) -> Result<()> {
        if self.accumulator.is_empty() {
            return Ok(());
        }

        let chunk = serialize_chunk(self.accumulator.items(), &self.config)?;
        let key_values = self
            .tracker
            .previous_keys()
            .cloned()
            .unwrap_or_default();
        let record = self.paginator.annotate(
            chunk,
            key_values,
            self.accumulator.rows_seen(),
            &self.config,
        );
        self.router.route(&record)?;
        self.accumulator.reset();
        self.chunks_out += 1;
        tracing::debug!(
            chunk = self.chunks_out,
            rows = self.accumulator.rows_seen(),
            "chunk flushed"
        );
        Ok(())
    }
}

/// Emitted row schema: keys (source kinds), value, then optional columns
fn build_output_schema(
    schema: &RowSchema,
    key_indexes: &[usize],
    config: &OutputConfig,
) -> Result<RowSchema> {
    let mut out = RowSchema::default();
    for &index in key_indexes {
        let field = schema
            .field(index)
            .ok_or_else(|| JoutError::Internal("key index out of range".to_string()))?;
        out.push(field.clone());
    }

    let value_field = config
        .value_field
        .as_ref()
        .ok_or(JoutError::MissingOutputField)?;
    out.push(FieldMeta::new(value_field.clone(), ValueKind::Text));

    if let Some(name) = &config.size_field {
        out.push(FieldMeta::new(name.clone(), ValueKind::Int));
    }
    if let Some(name) = &config.page_start_field {
        out.push(FieldMeta::new(name.clone(), ValueKind::Int));
    }
    if let Some(name) = &config.page_end_field {
        out.push(FieldMeta::new(name.clone(), ValueKind::Int));
    }

    Ok(out)
}

//! jout CLI - assemble NDJSON rows into JSON documents
//!
//! This binary provides command-line interfaces for:
//! - run: stream NDJSON rows through the assembly engine
//! - schema: infer a field schema from an NDJSON input
//!
//! The engine itself is transport-agnostic; this binary supplies the pieces
//! the host pipeline owns in production: row ingestion, the filesystem chunk
//! sink with part numbering, and the emitted-row NDJSON stream.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use jout_core::{
    Decimal, FieldMeta, JoutError, OutputConfig, Row, RowSchema, RowValue, ValueKind,
};
use jout_engine::{ChunkSink, DocumentEngine, EngineSummary, RowSink};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jout")]
#[command(about = "Assemble streamed NDJSON rows into grouped, paginated JSON documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream NDJSON rows through the assembly engine
    ///
    /// Examples:
    ///   jout run input.ndjson --config assembly.toml --output docs.json
    ///   jout run input.ndjson --config assembly.toml --rows-out pages.ndjson
    Run {
        /// Input NDJSON file (one row object per line), or '-' for stdin
        input: PathBuf,
        /// TOML configuration file for the engine
        #[arg(short, long)]
        config: PathBuf,
        /// Target file for written chunks; part-numbered per chunk unless --append
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Append every chunk to one file instead of writing part-numbered segments
        #[arg(long)]
        append: bool,
        /// Write emitted rows as NDJSON here instead of stdout
        #[arg(long)]
        rows_out: Option<PathBuf>,
        /// Explicit schema TOML (inferred from the first row when omitted)
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Pretty-print documents regardless of the config
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,
        /// Force compact documents regardless of the config
        #[arg(long)]
        compact: bool,
        /// Show a progress spinner while streaming
        #[arg(long)]
        progress: bool,
    },
    /// Infer a field schema from an NDJSON input and print it as TOML
    ///
    /// Examples:
    ///   jout schema input.ndjson
    Schema {
        /// Input NDJSON file, or '-' for stdin
        input: PathBuf,
    },
}

/// Schema file shape: `[[fields]]` entries with name and kind
#[derive(Debug, Serialize, Deserialize)]
struct SchemaFile {
    fields: Vec<FieldMeta>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            config,
            output,
            append,
            rows_out,
            schema,
            pretty,
            compact,
            progress,
        } => handle_run(
            input, config, output, append, rows_out, schema, pretty, compact, progress,
        ),
        Commands::Schema { input } => handle_schema(input),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_run(
    input: PathBuf,
    config_path: PathBuf,
    output: Option<PathBuf>,
    append: bool,
    rows_out: Option<PathBuf>,
    schema_path: Option<PathBuf>,
    pretty: bool,
    compact: bool,
    progress: bool,
) -> Result<(), Box<dyn Error>> {
    let mut config: OutputConfig = toml::from_str(&std::fs::read_to_string(&config_path)?)?;
    if pretty {
        config.pretty = true;
    }
    if compact {
        config.pretty = false;
    }

    if config.mode.writes_file() && output.is_none() {
        return Err("configuration writes files but no --output target was given".into());
    }

    let mut lines = open_input(&input)?.lines();

    // Schema comes from the file when given, otherwise from the first row
    let mut pending_first: Option<Value> = None;
    let schema = match schema_path {
        Some(path) => {
            let file: SchemaFile = toml::from_str(&std::fs::read_to_string(&path)?)?;
            RowSchema::new(file.fields)
        }
        None => match next_record(&mut lines)? {
            Some(record) => {
                let schema = infer_schema(&record)?;
                pending_first = Some(record);
                schema
            }
            None => {
                tracing::info!("input is empty and no schema was given, nothing to do");
                return Ok(());
            }
        },
    };
    let schema = Arc::new(schema);

    let row_sink: Option<Box<dyn RowSink>> = if config.mode.emits_value() {
        let writer: Box<dyn Write> = match &rows_out {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(std::io::stdout()),
        };
        Some(Box::new(NdjsonRowSink::new(writer)))
    } else {
        None
    };

    let chunk_sink: Option<Box<dyn ChunkSink>> = if config.mode.writes_file() {
        let target = output.expect("checked above");
        Some(Box::new(FileChunkSink::new(target, append)))
    } else {
        None
    };

    let mut engine = DocumentEngine::new(schema.clone(), config, row_sink, chunk_sink)?;

    let spinner = progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .expect("valid spinner template"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        pb
    });

    let mut rows_in: u64 = 0;
    if let Some(record) = pending_first.take() {
        push_record(&mut engine, &schema, record)?;
        rows_in += 1;
    }
    while let Some(record) = next_record(&mut lines)? {
        push_record(&mut engine, &schema, record)?;
        rows_in += 1;
        if let Some(pb) = &spinner {
            if rows_in % 1000 == 0 {
                pb.set_message(format!("{} rows", rows_in));
            }
        }
    }

    let summary: EngineSummary = engine.finish()?;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    eprintln!(
        "{} rows in, {} chunks out",
        summary.rows_in, summary.chunks_out
    );
    Ok(())
}

fn handle_schema(input: PathBuf) -> Result<(), Box<dyn Error>> {
    let mut lines = open_input(&input)?.lines();
    let record = next_record(&mut lines)?
        .ok_or("input is empty, cannot infer a schema")?;
    let schema = infer_schema(&record)?;
    let file = SchemaFile {
        fields: schema.fields().cloned().collect(),
    };
    print!("{}", toml::to_string_pretty(&file)?);
    Ok(())
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>, Box<dyn Error>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufReader::new(std::io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Next non-blank NDJSON record as a JSON object
fn next_record(
    lines: &mut std::io::Lines<Box<dyn BufRead>>,
) -> Result<Option<Value>, Box<dyn Error>> {
    for line in lines.by_ref() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)?;
        if !value.is_object() {
            return Err(format!("expected a JSON object per line, got: {}", value).into());
        }
        return Ok(Some(value));
    }
    Ok(None)
}

fn push_record(
    engine: &mut DocumentEngine,
    schema: &RowSchema,
    record: Value,
) -> Result<(), Box<dyn Error>> {
    let row = coerce_row(schema, &record)?;
    engine.push_row(&row)?;
    Ok(())
}

/// Coerce one JSON record into a typed row following the declared schema
///
/// A declared field missing from the record becomes a blank cell; a value of
/// the wrong shape is a fatal error naming the field.
fn coerce_row(schema: &RowSchema, record: &Value) -> Result<Row, JoutError> {
    let object = record
        .as_object()
        .ok_or_else(|| JoutError::Internal("record is not an object".to_string()))?;

    let mut row = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let cell = match object.get(&field.name) {
            None | Some(Value::Null) => RowValue::Null,
            Some(value) => coerce_cell(field, value)?,
        };
        row.push(cell);
    }
    Ok(row)
}

fn coerce_cell(field: &FieldMeta, value: &Value) -> Result<RowValue, JoutError> {
    let mismatch = || JoutError::TypeMismatch {
        field: field.name.clone(),
        expected: field.kind.name().to_string(),
    };

    match field.kind {
        ValueKind::Bool => value.as_bool().map(RowValue::Bool).ok_or_else(mismatch),
        ValueKind::Int => value.as_i64().map(RowValue::Int).ok_or_else(mismatch),
        ValueKind::Float => value.as_f64().map(RowValue::Float).ok_or_else(mismatch),
        ValueKind::Decimal => match value {
            Value::Number(n) => Decimal::from_str_exact(&n.to_string()).map(RowValue::Decimal),
            _ => Err(mismatch()),
        },
        ValueKind::Text => match value {
            Value::String(s) => Ok(RowValue::Text(s.clone())),
            // Nested structures arrive as their minified JSON text, ready to
            // be re-embedded by a fragment field
            other => Ok(RowValue::Text(serde_json::to_string(other)?)),
        },
    }
}

/// Infer a schema from the first record of the stream
fn infer_schema(record: &Value) -> Result<RowSchema, Box<dyn Error>> {
    let object = record
        .as_object()
        .ok_or("first record is not a JSON object")?;

    let mut schema = RowSchema::default();
    for (name, value) in object {
        let kind = match value {
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.is_i64() => ValueKind::Int,
            Value::Number(_) => ValueKind::Float,
            // Strings, nulls, and nested structures all ingest as text
            _ => ValueKind::Text,
        };
        schema.push(FieldMeta::new(name.clone(), kind));
    }
    Ok(schema)
}

/// Emits rows as NDJSON objects keyed by the engine's output schema
struct NdjsonRowSink {
    writer: Box<dyn Write>,
    field_names: Vec<String>,
}

impl NdjsonRowSink {
    fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            field_names: Vec::new(),
        }
    }
}

impl RowSink for NdjsonRowSink {
    fn bind(&mut self, schema: &RowSchema) {
        self.field_names = schema.fields().map(|f| f.name.clone()).collect();
    }

    fn push(&mut self, row: Row) -> jout_core::Result<()> {
        let mut object = serde_json::Map::new();
        for (i, cell) in row.into_iter().enumerate() {
            let name = self
                .field_names
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("column_{}", i));
            object.insert(name, cell_to_value(cell)?);
        }
        serde_json::to_writer(&mut self.writer, &Value::Object(object))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

fn cell_to_value(cell: RowValue) -> jout_core::Result<Value> {
    Ok(match cell {
        RowValue::Null => Value::Null,
        RowValue::Bool(b) => Value::Bool(b),
        RowValue::Int(i) => Value::Number(i.into()),
        RowValue::Float(x) => serde_json::Number::from_f64(x)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        RowValue::Decimal(d) => Value::Number(d.to_json_number()?),
        RowValue::Text(s) => Value::String(s),
    })
}

/// File sink: one part-numbered segment per chunk, or one appended file
///
/// Filename decoration beyond the part number (dates, copy numbers) belongs
/// to the surrounding pipeline and is out of scope here.
struct FileChunkSink {
    target: PathBuf,
    append: bool,
    split_nr: usize,
    file: Option<BufWriter<File>>,
}

impl FileChunkSink {
    fn new(target: PathBuf, append: bool) -> Self {
        Self {
            target,
            append,
            split_nr: 0,
            file: None,
        }
    }

    fn segment_path(&self) -> PathBuf {
        if self.append {
            return self.target.clone();
        }
        let stem = self
            .target
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match self.target.extension() {
            Some(ext) => format!("{}_{:04}.{}", stem, self.split_nr, ext.to_string_lossy()),
            None => format!("{}_{:04}", stem, self.split_nr),
        };
        self.target.with_file_name(name)
    }
}

impl ChunkSink for FileChunkSink {
    fn open(&mut self) -> jout_core::Result<()> {
        if self.file.is_some() {
            return Ok(());
        }
        let path = self.segment_path();
        let file = if self.append {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?
        } else {
            File::create(&path)?
        };
        tracing::debug!(path = %path.display(), "opened chunk segment");
        self.file = Some(BufWriter::new(file));
        if !self.append {
            self.split_nr += 1;
        }
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> jout_core::Result<()> {
        match &mut self.file {
            Some(file) => {
                file.write_all(bytes)?;
                Ok(())
            }
            None => Err(JoutError::Internal("write on a closed sink".to_string())),
        }
    }

    fn close(&mut self) -> jout_core::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

//! Output configuration
//!
//! The configuration surface is consumed, not owned, by the engine: the host
//! loads it (the CLI uses TOML), performs any variable substitution on
//! element names, and hands the resolved struct over before the first row.

use serde::{Deserialize, Serialize};

use crate::error::{JoutError, Result};

/// Where serialized chunks go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationMode {
    /// Emit one downstream row per chunk
    EmitValue,
    /// Write each chunk to the configured sink
    WriteFile,
    /// Both of the above
    Both,
}

impl OperationMode {
    /// True when chunks produce downstream rows
    pub fn emits_value(&self) -> bool {
        matches!(self, OperationMode::EmitValue | OperationMode::Both)
    }

    /// True when chunks are written to a sink
    pub fn writes_file(&self) -> bool {
        matches!(self, OperationMode::WriteFile | OperationMode::Both)
    }
}

/// How chunk boundaries are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// One document for the whole stream (subject only to row-count splits)
    Flat,
    /// New document whenever the group key changes
    GroupLoop,
}

/// One projected output field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Name of the source field in the row schema
    pub source_field: String,
    /// Element name in the produced document (already substituted)
    pub element_name: String,
    /// Treat the source text as pre-formed JSON and embed it structurally
    #[serde(default)]
    pub json_fragment: bool,
    /// Omit the element entirely when the source value is blank
    #[serde(default)]
    pub remove_if_blank: bool,
}

impl FieldSpec {
    /// Field whose element name equals the source field name
    pub fn named(source_field: impl Into<String>) -> Self {
        let source_field = source_field.into();
        Self {
            element_name: source_field.clone(),
            source_field,
            json_fragment: false,
            remove_if_blank: false,
        }
    }
}

/// One group key field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFieldSpec {
    /// Name of the source field in the row schema
    pub source_field: String,
}

impl KeyFieldSpec {
    /// Convenience constructor
    pub fn new(source_field: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
        }
    }
}

/// Output text encoding
///
/// Governs the byte count reported in the size column and the bytes handed
/// to the chunk sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// UTF-8 (default)
    #[default]
    Utf8,
    /// UTF-16 little-endian, no BOM
    Utf16Le,
    /// UTF-16 big-endian, no BOM
    Utf16Be,
}

impl Encoding {
    /// Byte length of `text` in this encoding
    pub fn encoded_len(&self, text: &str) -> usize {
        match self {
            Encoding::Utf8 => text.len(),
            Encoding::Utf16Le | Encoding::Utf16Be => text.encode_utf16().count() * 2,
        }
    }

    /// Encode `text` to bytes
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16Le => text
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect(),
            Encoding::Utf16Be => text
                .encode_utf16()
                .flat_map(|unit| unit.to_be_bytes())
                .collect(),
        }
    }
}

/// Full configuration for one engine run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output routing mode
    pub mode: OperationMode,
    /// Chunk boundary mode
    pub generation: GenerationMode,
    /// Optional wrapping block name
    #[serde(default)]
    pub block_name: Option<String>,
    /// Pretty-print the serialized document
    #[serde(default)]
    pub pretty: bool,
    /// Flush after this many rows in a chunk (0 = disabled)
    #[serde(default)]
    pub split_after: usize,
    /// Keep a singleton chunk as a one-element array instead of a bare object
    #[serde(default)]
    pub array_for_single: bool,
    /// Projected output fields, in document order
    pub fields: Vec<FieldSpec>,
    /// Group key fields, in declared order
    #[serde(default)]
    pub key_fields: Vec<KeyFieldSpec>,
    /// Output column name for the serialized document (required when emitting)
    #[serde(default)]
    pub value_field: Option<String>,
    /// Output column name for the serialized size in bytes
    #[serde(default)]
    pub size_field: Option<String>,
    /// Output column name for the chunk's first source row number
    #[serde(default)]
    pub page_start_field: Option<String>,
    /// Output column name for the chunk's last source row number
    #[serde(default)]
    pub page_end_field: Option<String>,
    /// Output text encoding
    #[serde(default)]
    pub encoding: Encoding,
    /// Open the chunk sink at setup instead of at first flush
    #[serde(default)]
    pub eager_open: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OperationMode::EmitValue,
            generation: GenerationMode::GroupLoop,
            block_name: None,
            pretty: false,
            split_after: 0,
            array_for_single: false,
            fields: Vec::new(),
            key_fields: Vec::new(),
            value_field: None,
            size_field: None,
            page_start_field: None,
            page_end_field: None,
            encoding: Encoding::Utf8,
            eager_open: false,
        }
    }
}

impl OutputConfig {
    /// Fatal setup checks that do not need the row schema
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(JoutError::InvalidConfig(
                "at least one output field is required".to_string(),
            ));
        }
        if self.mode.emits_value() {
            match &self.value_field {
                Some(name) if !name.is_empty() => {}
                _ => return Err(JoutError::MissingOutputField),
            }
        }
        if let Some(name) = &self.block_name {
            if name.is_empty() {
                return Err(JoutError::InvalidConfig(
                    "block_name must not be empty when set".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> OutputConfig {
        OutputConfig {
            fields: vec![FieldSpec::named("id")],
            value_field: Some("result".to_string()),
            ..OutputConfig::default()
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_fields() {
        let mut cfg = minimal();
        cfg.fields.clear();
        assert!(matches!(
            cfg.validate(),
            Err(JoutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_requires_value_field_when_emitting() {
        let mut cfg = minimal();
        cfg.value_field = None;
        assert!(matches!(
            cfg.validate(),
            Err(JoutError::MissingOutputField)
        ));

        // File-only mode needs no value field
        cfg.mode = OperationMode::WriteFile;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_encoding_byte_lengths() {
        // "héllo" is 6 bytes UTF-8, 5 UTF-16 units
        let text = "h\u{e9}llo";
        assert_eq!(Encoding::Utf8.encoded_len(text), 6);
        assert_eq!(Encoding::Utf16Le.encoded_len(text), 10);
        assert_eq!(Encoding::Utf16Be.encoded_len(text), 10);

        assert_eq!(Encoding::Utf16Le.encode("A"), vec![0x41, 0x00]);
        assert_eq!(Encoding::Utf16Be.encode("A"), vec![0x00, 0x41]);
    }

    #[test]
    fn test_config_roundtrip_toml_shape() {
        let cfg = minimal();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: OutputConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fields, cfg.fields);
        assert_eq!(back.value_field, cfg.value_field);
    }
}

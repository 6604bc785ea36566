//! Row schemas
//!
//! A schema is resolved once before streaming begins and shared (via `Arc`)
//! by every row of the stream. Rows themselves are plain value vectors whose
//! positions match the schema.

use serde::{Deserialize, Serialize};

use crate::value::{RowValue, ValueKind};

/// One declared field of a row schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Field name, unique within the schema
    pub name: String,
    /// Declared kind
    pub kind: ValueKind,
}

impl FieldMeta {
    /// Convenience constructor
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered, fixed-arity row schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSchema {
    fields: Vec<FieldMeta>,
}

impl RowSchema {
    /// Build a schema from an ordered field list
    pub fn new(fields: Vec<FieldMeta>) -> Self {
        Self { fields }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a field by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Field metadata at a position
    pub fn field(&self, index: usize) -> Option<&FieldMeta> {
        self.fields.get(index)
    }

    /// Iterate fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter()
    }

    /// Append a field, returning its position
    pub fn push(&mut self, field: FieldMeta) -> usize {
        self.fields.push(field);
        self.fields.len() - 1
    }
}

/// One row: typed values positionally matching a shared schema
pub type Row = Vec<RowValue>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RowSchema {
        RowSchema::new(vec![
            FieldMeta::new("id", ValueKind::Int),
            FieldMeta::new("name", ValueKind::Text),
            FieldMeta::new("active", ValueKind::Bool),
        ])
    }

    #[test]
    fn test_index_of() {
        let schema = sample();
        assert_eq!(schema.index_of("name"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
    }

    #[test]
    fn test_field_access() {
        let schema = sample();
        assert_eq!(schema.field(2).unwrap().kind, ValueKind::Bool);
        assert!(schema.field(3).is_none());
        assert_eq!(schema.len(), 3);
    }
}

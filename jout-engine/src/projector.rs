//! Field projection
//!
//! Converts one typed row cell into the JSON leaf stored under the field's
//! element name. Blank suppression is decided once, ahead of the per-type
//! dispatch, so the remove-if-blank contract holds uniformly for every
//! declared kind.

use jout_core::{FieldSpec, Result, RowValue};
use serde_json::Value;

/// Outcome of projecting one field of one row
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Store this leaf under the element name
    Leaf(Value),
    /// Omit the element entirely
    Absent,
}

/// Project one cell according to its field spec
///
/// Fragment parse failures and non-finite floats are per-row diagnostics,
/// never errors: the field is skipped (or nulled) and the row proceeds.
pub fn project(value: &RowValue, spec: &FieldSpec) -> Result<Projection> {
    // Uniform blank handling for all kinds
    if value.is_null() {
        return Ok(if spec.remove_if_blank {
            Projection::Absent
        } else {
            Projection::Leaf(Value::Null)
        });
    }

    let leaf = match value {
        RowValue::Null => unreachable!("blank cells handled above"),
        RowValue::Bool(b) => Value::Bool(*b),
        RowValue::Int(i) => Value::Number((*i).into()),
        RowValue::Float(x) => match serde_json::Number::from_f64(*x) {
            Some(n) => Value::Number(n),
            None => {
                tracing::warn!(
                    element = %spec.element_name,
                    value = *x,
                    "non-finite float has no JSON rendering, writing null"
                );
                Value::Null
            }
        },
        RowValue::Decimal(d) => Value::Number(d.to_json_number()?),
        RowValue::Text(s) => {
            if spec.json_fragment {
                match serde_json::from_str::<Value>(s) {
                    Ok(parsed) => parsed,
                    Err(err) => {
                        tracing::warn!(
                            element = %spec.element_name,
                            error = %err,
                            "skipping malformed JSON fragment"
                        );
                        return Ok(Projection::Absent);
                    }
                }
            } else {
                Value::String(s.clone())
            }
        }
    };

    Ok(Projection::Leaf(leaf))
}

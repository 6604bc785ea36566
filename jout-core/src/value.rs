//! Typed row values and declared field kinds

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;

/// Declared field kinds (closed set)
///
/// Every source type the host pipeline can declare maps onto one of these;
/// anything without a native JSON shape arrives as `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Boolean value
    Bool,
    /// 64-bit signed integer
    Int,
    /// Double-precision float
    Float,
    /// Arbitrary-precision decimal
    Decimal,
    /// Text, including pre-formed JSON fragments
    Text,
}

impl ValueKind {
    /// Human-readable kind name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Decimal => "decimal",
            ValueKind::Text => "text",
        }
    }
}

/// One typed cell of a row
///
/// `Null` is the single blank representation for every kind, which keeps
/// blank suppression a single code path in the projector.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    /// Blank source value
    Null,
    /// Boolean cell
    Bool(bool),
    /// Integer cell
    Int(i64),
    /// Float cell
    Float(f64),
    /// Exact decimal cell
    Decimal(Decimal),
    /// Text cell
    Text(String),
}

impl RowValue {
    /// True when the cell holds no value
    pub fn is_null(&self) -> bool {
        matches!(self, RowValue::Null)
    }

    /// True when the cell matches the declared kind (null matches any)
    pub fn matches_kind(&self, kind: ValueKind) -> bool {
        match self {
            RowValue::Null => true,
            RowValue::Bool(_) => kind == ValueKind::Bool,
            RowValue::Int(_) => kind == ValueKind::Int,
            RowValue::Float(_) => kind == ValueKind::Float,
            RowValue::Decimal(_) => kind == ValueKind::Decimal,
            RowValue::Text(_) => kind == ValueKind::Text,
        }
    }

    /// Type-aware total ordering used for group comparison
    ///
    /// Numeric kinds compare numerically, text lexically, and `Null` sorts
    /// before any present value. Mixed-variant cells never occur for a
    /// resolved key field, but the fallback keeps the ordering total by
    /// ranking variants in declaration order.
    pub fn compare(&self, other: &RowValue) -> Ordering {
        match (self, other) {
            (RowValue::Null, RowValue::Null) => Ordering::Equal,
            (RowValue::Null, _) => Ordering::Less,
            (_, RowValue::Null) => Ordering::Greater,
            (RowValue::Bool(a), RowValue::Bool(b)) => a.cmp(b),
            (RowValue::Int(a), RowValue::Int(b)) => a.cmp(b),
            (RowValue::Float(a), RowValue::Float(b)) => a.total_cmp(b),
            (RowValue::Decimal(a), RowValue::Decimal(b)) => a.compare(b),
            (RowValue::Text(a), RowValue::Text(b)) => a.cmp(b),
            // Mixed variants: rank by variant order so the ordering stays total
            (a, b) => variant_rank(a).cmp(&variant_rank(b)),
        }
    }
}

fn variant_rank(value: &RowValue) -> u8 {
    match value {
        RowValue::Null => 0,
        RowValue::Bool(_) => 1,
        RowValue::Int(_) => 2,
        RowValue::Float(_) => 3,
        RowValue::Decimal(_) => 4,
        RowValue::Text(_) => 5,
    }
}

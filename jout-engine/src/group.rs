//! Group-change detection
//!
//! Tracks the key-field projection of the previous row and reports whether
//! the current row starts a new group. The tracker is seeded from the first
//! row, so the first row can never be a flush trigger by itself.

use jout_core::{Row, RowValue};
use smallvec::SmallVec;

/// Per-row snapshot of the key-field values
pub type KeyValues = SmallVec<[RowValue; 4]>;

/// Compares the key-field projection of consecutive rows
#[derive(Debug)]
pub struct GroupTracker {
    /// Resolved positions of the key fields in the row schema
    key_indexes: Vec<usize>,
    /// Key values of the previously seen row, `None` before the first row
    previous: Option<KeyValues>,
}

impl GroupTracker {
    /// Build a tracker over resolved key positions
    pub fn new(key_indexes: Vec<usize>) -> Self {
        Self {
            key_indexes,
            previous: None,
        }
    }

    /// Number of key fields
    pub fn key_count(&self) -> usize {
        self.key_indexes.len()
    }

    /// Extract the key values of a row, in declared key order
    pub fn key_values(&self, row: &Row) -> KeyValues {
        self.key_indexes
            .iter()
            .map(|&i| row[i].clone())
            .collect()
    }

    /// True when `row` starts a new group
    ///
    /// Key values compare positionally with each field's natural ordering.
    /// Before the first row is remembered there is nothing to compare, and
    /// with zero key fields every row belongs to one group.
    pub fn is_new_group(&self, row: &Row) -> bool {
        let previous = match &self.previous {
            Some(prev) => prev,
            None => return false,
        };
        if self.key_indexes.is_empty() {
            return false;
        }
        self.key_indexes
            .iter()
            .zip(previous.iter())
            .any(|(&i, prev)| prev.compare(&row[i]).is_ne())
    }

    /// Remember `row` as the previous row
    pub fn remember(&mut self, row: &Row) {
        self.previous = Some(self.key_values(row));
    }

    /// True once a row has been remembered
    pub fn is_seeded(&self) -> bool {
        self.previous.is_some()
    }

    /// Key values of the most recently remembered row
    pub fn previous_keys(&self) -> Option<&KeyValues> {
        self.previous.as_ref()
    }
}

//! The row store boundary.
//!
//! `RowStore` is the narrow interface to the shared tabular backend. It is
//! addressed by row index and by the `Column` enum, which only reaches A–G:
//! the rest of the sheet belongs to other subsystems and stays untouched.
//!
//! The free-slot and identifier-scan logic is kept as pure functions over a
//! freshly read column snapshot. Nothing here caches rows between calls —
//! every decision re-reads current state to avoid stale-duplicate races.

use crate::error::Result;
use crate::types::{Column, RowStatus};
use std::collections::BTreeMap;

/// Row 1 is a header; registration data starts here.
pub const DATA_START_ROW: u32 = 2;

// ---------------------------------------------------------------------------
// RowRecord / RowFields
// ---------------------------------------------------------------------------

/// One row as read from the store, keyed by column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowRecord {
    cells: BTreeMap<Column, String>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, col: Column) -> &str {
        self.cells.get(&col).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, col: Column, value: impl Into<String>) {
        self.cells.insert(col, value.into());
    }

    pub fn status(&self) -> RowStatus {
        RowStatus::from_cell(self.get(Column::G))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// The seven values of an append, in column order A–G.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    values: [String; 7],
}

impl RowFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, col: Column, value: impl Into<String>) -> Self {
        self.values[col.index()] = value.into();
        self
    }

    pub fn get(&self, col: Column) -> &str {
        &self.values[col.index()]
    }

    pub fn as_slice(&self) -> &[String; 7] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// RowStore
// ---------------------------------------------------------------------------

/// Narrow contract against the remote tabular store.
///
/// There is no multi-cell transaction guarantee: callers must treat the
/// presence of a value in column A as "row exists" and never assume a
/// partially failed append produced anything usable.
pub trait RowStore {
    /// Read one column across the data region. Index 0 corresponds to
    /// `DATA_START_ROW`; gaps come back as empty strings.
    fn read_column(&self, col: Column) -> Result<Vec<String>>;

    /// Read one full row (columns A–G).
    fn read_row(&self, row: u32) -> Result<RowRecord>;

    /// Write columns A–G at an explicit row index in one logical operation.
    fn append_row(&mut self, row: u32, fields: &RowFields) -> Result<()>;

    /// Targeted single-cell update.
    fn write_cell(&mut self, row: u32, col: Column, value: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Pure snapshot helpers
// ---------------------------------------------------------------------------

/// Normalize an external identifier to its digits: trims whitespace and a
/// trailing ".0" that spreadsheet number formatting likes to add.
pub fn normalize_identifier(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(stripped) = text.strip_suffix(".0") {
        text = stripped;
    }
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// First insertion point in a fresh column-A snapshot: the first empty cell,
/// or one past the end. Never below `DATA_START_ROW`.
pub fn first_free_row(column_a: &[String]) -> u32 {
    for (i, cell) in column_a.iter().enumerate() {
        if cell.trim().is_empty() {
            return DATA_START_ROW + i as u32;
        }
    }
    DATA_START_ROW + column_a.len() as u32
}

/// Scan a column-A snapshot for an identifier, returning its row index.
pub fn find_identifier(column_a: &[String], identifier: &str) -> Option<u32> {
    let target = normalize_identifier(identifier);
    if target.is_empty() {
        return None;
    }
    for (i, cell) in column_a.iter().enumerate() {
        let candidate = normalize_identifier(cell);
        if !candidate.is_empty() && candidate == target {
            return Some(DATA_START_ROW + i as u32);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_free_row_on_empty_snapshot_is_data_start() {
        assert_eq!(first_free_row(&[]), 2);
    }

    #[test]
    fn first_free_row_appends_after_last_value() {
        assert_eq!(first_free_row(&col(&["100", "200", "300"])), 5);
    }

    #[test]
    fn first_free_row_prefers_gaps() {
        assert_eq!(first_free_row(&col(&["100", "", "300"])), 3);
        assert_eq!(first_free_row(&col(&["100", "  ", "300"])), 3);
    }

    #[test]
    fn normalize_identifier_strips_noise() {
        assert_eq!(normalize_identifier(" 42 "), "42");
        assert_eq!(normalize_identifier("42.0"), "42");
        assert_eq!(normalize_identifier("4 2"), "42");
        assert_eq!(normalize_identifier(""), "");
        assert_eq!(normalize_identifier("abc"), "");
    }

    #[test]
    fn find_identifier_matches_normalized_forms() {
        let snapshot = col(&["100", "42.0", "300"]);
        assert_eq!(find_identifier(&snapshot, "42"), Some(3));
        assert_eq!(find_identifier(&snapshot, " 100 "), Some(2));
        assert_eq!(find_identifier(&snapshot, "999"), None);
    }

    #[test]
    fn find_identifier_ignores_blank_cells_and_blank_targets() {
        let snapshot = col(&["", "", "7"]);
        assert_eq!(find_identifier(&snapshot, "7"), Some(4));
        assert_eq!(find_identifier(&snapshot, ""), None);
        assert_eq!(find_identifier(&snapshot, "   "), None);
    }

    #[test]
    fn row_fields_builder_sets_by_column() {
        let fields = RowFields::new()
            .with(Column::A, "42")
            .with(Column::G, "active");
        assert_eq!(fields.get(Column::A), "42");
        assert_eq!(fields.get(Column::B), "");
        assert_eq!(fields.get(Column::G), "active");
    }

    #[test]
    fn row_record_status_reads_column_g() {
        let mut record = RowRecord::new();
        assert_eq!(record.status(), RowStatus::Active);
        record.set(Column::G, "archived");
        assert_eq!(record.status(), RowStatus::Archived);
    }
}

//! In-memory sheet, the local implementation of [`RowStore`].
//!
//! Backs two things: the file-backed local mode of the CLI (persisted as
//! YAML with an atomic write) and the test double for the services. The grid
//! may be wider than column G — cells beyond G are carried through untouched,
//! which is exactly the contract the services must honor.

use crate::error::{Result, ShiftError};
use crate::io;
use crate::store::{RowFields, RowRecord, RowStore, DATA_START_ROW};
use crate::types::Column;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySheet {
    /// `rows[0]` is sheet row 1 (the header row).
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShiftError::StoreUnavailable(format!(
                "sheet file not found: {}",
                path.display()
            )));
        }
        let data = std::fs::read_to_string(path)?;
        let sheet: MemorySheet = serde_yaml::from_str(&data)?;
        Ok(sheet)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(path, data.as_bytes())
    }

    /// Number of data rows with a populated column A.
    pub fn populated_rows(&self) -> usize {
        self.rows
            .iter()
            .skip(DATA_START_ROW as usize - 1)
            .filter(|r| r.first().map(|a| !a.trim().is_empty()).unwrap_or(false))
            .count()
    }

    /// Raw cell access by zero-based column index, including columns past G.
    /// Used by tests and by operators inspecting the grid. Rows are 1-based;
    /// row 0 reads as empty.
    pub fn cell_raw(&self, row: u32, col_index: usize) -> &str {
        let Some(idx) = (row as usize).checked_sub(1) else {
            return "";
        };
        self.rows
            .get(idx)
            .and_then(|r| r.get(col_index))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Seed a raw cell, growing the grid as needed. Unlike the `RowStore`
    /// surface this can reach past column G — tests use it to lay down
    /// neighboring subsystems' data.
    pub fn seed_cell(&mut self, row: u32, col_index: usize, value: impl Into<String>) {
        let row_vec = self.row_mut(row);
        if row_vec.len() <= col_index {
            row_vec.resize(col_index + 1, String::new());
        }
        row_vec[col_index] = value.into();
    }

    fn row_mut(&mut self, row: u32) -> &mut Vec<String> {
        assert!(row >= 1, "sheet rows are 1-based");
        let idx = row as usize - 1;
        if self.rows.len() <= idx {
            self.rows.resize(idx + 1, Vec::new());
        }
        &mut self.rows[idx]
    }
}

impl RowStore for MemorySheet {
    fn read_column(&self, col: Column) -> Result<Vec<String>> {
        Ok(self
            .rows
            .iter()
            .skip(DATA_START_ROW as usize - 1)
            .map(|r| r.get(col.index()).cloned().unwrap_or_default())
            .collect())
    }

    fn read_row(&self, row: u32) -> Result<RowRecord> {
        let mut record = RowRecord::new();
        for &col in Column::all() {
            record.set(col, self.cell_raw(row, col.index()));
        }
        Ok(record)
    }

    fn append_row(&mut self, row: u32, fields: &RowFields) -> Result<()> {
        let row_vec = self.row_mut(row);
        if row_vec.len() < 7 {
            row_vec.resize(7, String::new());
        }
        for &col in Column::all() {
            row_vec[col.index()] = fields.get(col).to_string();
        }
        Ok(())
    }

    fn write_cell(&mut self, row: u32, col: Column, value: &str) -> Result<()> {
        self.seed_cell(row, col.index(), value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Columns of the registration sheet owned by this core.
///
/// Deliberately stops at G: columns H onward belong to other subsystems and
/// are unaddressable from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// External identifier (lookup key).
    A,
    /// Last name.
    B,
    /// First name.
    C,
    /// Middle name (may be empty).
    D,
    /// Compact display name.
    E,
    /// Material reference (written after upload).
    F,
    /// Row status.
    G,
}

impl Column {
    pub fn all() -> &'static [Column] {
        &[
            Column::A,
            Column::B,
            Column::C,
            Column::D,
            Column::E,
            Column::F,
            Column::G,
        ]
    }

    /// Zero-based position within a sheet row.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Column::A => "A",
            Column::B => "B",
            Column::C => "C",
            Column::D => "D",
            Column::E => "E",
            Column::F => "F",
            Column::G => "G",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RowStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Active,
    Archived,
}

impl RowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RowStatus::Active => "active",
            RowStatus::Archived => "archived",
        }
    }

    /// Lenient read of a status cell: blank means active (the default on
    /// creation), anything unrecognized is also treated as active so that a
    /// hand-edited cell never locks a person out.
    pub fn from_cell(cell: &str) -> RowStatus {
        match cell.trim().to_lowercase().as_str() {
            "archived" => RowStatus::Archived,
            _ => RowStatus::Active,
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RowStatus {
    type Err = crate::error::ShiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RowStatus::Active),
            "archived" => Ok(RowStatus::Archived),
            _ => Err(crate::error::ShiftError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

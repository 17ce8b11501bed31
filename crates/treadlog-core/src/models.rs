//! Shared typed models used across the registry, ledger, and engine layers.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{TrackerError, TrackerResult};

// ---------------------------------------------------------------------------
// Column / category constants
// ---------------------------------------------------------------------------

pub const START_DATE_COLUMN: &str = "Start Date";
pub const TYPE_COLUMN: &str = "Type";
pub const NAME_COLUMN: &str = "Name";
pub const REMARKS_COLUMN: &str = "Remarks";
pub const ROUTE_COLUMN: &str = "Route";

/// The three leading columns every equipment table must carry, in order.
pub const REQUIRED_EQUIPMENT_COLUMNS: [&str; 3] = [START_DATE_COLUMN, TYPE_COLUMN, NAME_COLUMN];

pub const ROAD_CATEGORY: &str = "Road";
pub const XC_CATEGORY: &str = "XC";

// ---------------------------------------------------------------------------
// 1. Table
// ---------------------------------------------------------------------------

/// An already-materialised sheet: a header row plus rows of text cells.
///
/// Short rows are tolerated; a missing cell reads as the empty string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from string slices, handy for fixtures and callers that
    /// hold borrowed data.
    pub fn from_strs(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Resolve a column reference to a zero-based position.
    pub fn resolve(&self, column: &ColumnRef) -> TrackerResult<usize> {
        match column {
            ColumnRef::Name(name) => self.column_position(name).ok_or_else(|| {
                TrackerError::Schema(format!("column {name:?} not present in table"))
            }),
            ColumnRef::Position(pos) if *pos < self.columns.len() => Ok(*pos),
            ColumnRef::Position(pos) => Err(TrackerError::Schema(format!(
                "column position {pos} out of range ({} columns)",
                self.columns.len()
            ))),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Overwrite one cell, padding a short row with empty cells first.
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) -> TrackerResult<()> {
        let width = self.columns.len();
        let cells = self
            .rows
            .get_mut(row)
            .ok_or_else(|| TrackerError::NotFound(format!("row {row}")))?;
        if col >= width {
            return Err(TrackerError::Schema(format!(
                "column position {col} out of range ({width} columns)"
            )));
        }
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value;
        Ok(())
    }

    /// Every cell of one column, top to bottom.
    pub fn column_values(&self, col: usize) -> Vec<String> {
        (0..self.rows.len())
            .map(|row| self.cell(row, col).to_string())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// 2. References
// ---------------------------------------------------------------------------

/// Identifies a column either by header text or by zero-based position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRef {
    Name(String),
    Position(usize),
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => write!(f, "{name}"),
            ColumnRef::Position(pos) => write!(f, "#{pos}"),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<usize> for ColumnRef {
    fn from(pos: usize) -> Self {
        ColumnRef::Position(pos)
    }
}

/// Names one piece of equipment in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentRef {
    Row(usize),
    Name(String),
}

/// Shoe lookup key for ledger queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShoeRef<'a> {
    Name(&'a str),
    Row(usize),
}

impl<'a> From<&'a str> for ShoeRef<'a> {
    fn from(name: &'a str) -> Self {
        ShoeRef::Name(name)
    }
}

impl From<usize> for ShoeRef<'_> {
    fn from(row: usize) -> Self {
        ShoeRef::Row(row)
    }
}

// ---------------------------------------------------------------------------
// 3. EquipmentRecord
// ---------------------------------------------------------------------------

/// One row of the equipment table.
#[derive(Clone, Debug, PartialEq)]
pub struct EquipmentRecord {
    /// Storage position; stable for the lifetime of the registry.
    pub index: usize,
    pub category: String,
    pub name: String,
    /// `None` for a shoe listed before it went into service.
    pub start_date: Option<NaiveDate>,
    pub keywords: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// 4. CategoryPick
// ---------------------------------------------------------------------------

/// The equipment selected for a category in a base or new view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryPick {
    pub row_index: usize,
    pub start_date: NaiveDate,
    pub name: String,
}

// ---------------------------------------------------------------------------
// 5. LogEntry
// ---------------------------------------------------------------------------

/// A single dated row of the exercise log.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub remarks: String,
    pub route: String,
    pub miles: f64,
}

impl LogEntry {
    pub fn new(date: NaiveDate, remarks: &str, route: &str) -> Self {
        Self {
            date,
            remarks: remarks.to_string(),
            route: route.to_string(),
            miles: 0.0,
        }
    }

    pub fn with_miles(mut self, miles: f64) -> Self {
        self.miles = miles;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_reads_short_rows_as_empty() {
        let table = Table::from_strs(&["a", "b", "c"], &[&["1"]]);
        assert_eq!(table.cell(0, 0), "1");
        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn test_set_cell_pads_row() {
        let mut table = Table::from_strs(&["a", "b", "c"], &[&["1"]]);
        table.set_cell(0, 2, "x".to_string()).unwrap();
        assert_eq!(table.rows[0], vec!["1", "", "x"]);
    }

    #[test]
    fn test_set_cell_rejects_unknown_column() {
        let mut table = Table::from_strs(&["a"], &[&["1"]]);
        assert!(matches!(
            table.set_cell(0, 3, "x".to_string()),
            Err(TrackerError::Schema(_))
        ));
    }

    #[test]
    fn test_resolve_by_name_and_position() {
        let table = Table::from_strs(&["a", "YTD"], &[]);
        assert_eq!(table.resolve(&"YTD".into()).unwrap(), 1);
        assert_eq!(table.resolve(&ColumnRef::Position(0)).unwrap(), 0);
        assert!(table.resolve(&ColumnRef::Position(2)).is_err());
        assert!(table.resolve(&"Miles".into()).is_err());
    }
}

//! Canonical equipment table.
//!
//! Wraps the equipment sheet: validates its leading columns, parses the
//! day-first start dates, precomputes each name's keyword set, and knows how
//! to push a column back to the external store. Blank rows at the bottom of
//! the sheet are dropped; a blank start date marks a shoe not yet in service.

pub mod keywords;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::dates::parse_day_first;
use crate::errors::{TrackerError, TrackerResult};
use crate::models::{
    ColumnRef, EquipmentRecord, EquipmentRef, Table, REQUIRED_EQUIPMENT_COLUMNS,
};
use crate::store::SheetStore;

pub use keywords::findwords;

pub struct EquipmentRegistry {
    table: Table,
    records: Vec<EquipmentRecord>,
    by_name: IndexMap<String, usize>,
    handle: Option<Box<dyn SheetStore>>,
    sheet_name: String,
    start_row: usize,
}

impl std::fmt::Debug for EquipmentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquipmentRegistry")
            .field("records", &self.records)
            .field("has_handle", &self.handle.is_some())
            .field("sheet_name", &self.sheet_name)
            .finish()
    }
}

impl EquipmentRegistry {
    /// Build a registry with no store handle; write-backs will fail.
    pub fn new(table: Table) -> TrackerResult<Self> {
        Self::build(table, None, &TrackerConfig::default())
    }

    pub fn with_handle(table: Table, handle: Box<dyn SheetStore>) -> TrackerResult<Self> {
        Self::build(table, Some(handle), &TrackerConfig::default())
    }

    /// Build a registry whose write-backs follow `config`.
    pub fn from_config(
        table: Table,
        handle: Option<Box<dyn SheetStore>>,
        config: &TrackerConfig,
    ) -> TrackerResult<Self> {
        Self::build(table, handle, config)
    }

    fn build(
        table: Table,
        handle: Option<Box<dyn SheetStore>>,
        config: &TrackerConfig,
    ) -> TrackerResult<Self> {
        let leading: Vec<&str> = table.columns.iter().take(3).map(String::as_str).collect();
        if leading != REQUIRED_EQUIPMENT_COLUMNS {
            return Err(TrackerError::Schema(format!(
                "equipment table must start with columns {REQUIRED_EQUIPMENT_COLUMNS:?}, found {leading:?}"
            )));
        }

        let mut table = table;
        let mut trimmed = 0;
        while table.rows.last().is_some_and(|row| is_blank_row(row)) {
            table.rows.pop();
            trimmed += 1;
        }
        if trimmed > 0 {
            debug!(trimmed, "dropped blank rows at the end of the equipment sheet");
        }

        let mut records = Vec::with_capacity(table.len());
        let mut by_name = IndexMap::with_capacity(table.len());
        for index in 0..table.len() {
            let name = table.cell(index, 2).trim().to_string();
            let date_text = table.cell(index, 0);
            let start_date = if date_text.trim().is_empty() {
                None
            } else {
                Some(parse_day_first(date_text).map_err(|e| {
                    TrackerError::InvalidDate(format!("row {index} ({name}): {e}"))
                })?)
            };
            // Interior blank rows stay as unnamed records so row indices
            // keep lining up with the sheet.
            if !name.is_empty() && by_name.insert(name.clone(), index).is_some() {
                return Err(TrackerError::Schema(format!(
                    "equipment name {name:?} appears more than once"
                )));
            }
            records.push(EquipmentRecord {
                index,
                category: table.cell(index, 1).to_string(),
                keywords: findwords(&name),
                name,
                start_date,
            });
        }
        info!(rows = records.len(), "equipment registry loaded");

        Ok(Self {
            table,
            records,
            by_name,
            handle,
            sheet_name: config.equipment_sheet.clone(),
            start_row: config.write_back_start_row,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in storage order.
    pub fn records(&self) -> &[EquipmentRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&EquipmentRecord> {
        self.records.get(index)
    }

    /// Records of one category, in storage order.
    pub fn records_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a EquipmentRecord> + 'a {
        self.records.iter().filter(move |r| r.category == category)
    }

    pub fn row_index_for_name(&self, name: &str) -> TrackerResult<usize> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TrackerError::NotFound(format!("no equipment named {name:?}")))
    }

    pub fn name_for_row_index(&self, index: usize) -> TrackerResult<&str> {
        self.records
            .get(index)
            .map(|r| r.name.as_str())
            .ok_or_else(|| {
                TrackerError::NotFound(format!(
                    "equipment row {index} out of range ({} rows)",
                    self.records.len()
                ))
            })
    }

    pub fn resolve(&self, equipment: &EquipmentRef) -> TrackerResult<&EquipmentRecord> {
        let index = match equipment {
            EquipmentRef::Row(index) => *index,
            EquipmentRef::Name(name) => self.row_index_for_name(name)?,
        };
        self.records.get(index).ok_or_else(|| {
            TrackerError::NotFound(format!(
                "equipment row {index} out of range ({} rows)",
                self.records.len()
            ))
        })
    }

    /// The backing sheet, including any columns the registry does not model.
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    /// Overwrite one column of the external sheet with this table's column,
    /// top to bottom from the configured start row.
    pub fn write_back_column(&mut self, column: &ColumnRef) -> TrackerResult<()> {
        let position = self.table.resolve(column)?;
        let values = self.table.column_values(position);
        let handle = self.handle.as_mut().ok_or_else(|| {
            TrackerError::NoHandle(
                "no sheet store handle; pass one when building the registry".to_string(),
            )
        })?;
        debug!(
            sheet = %self.sheet_name,
            column = %column,
            cells = values.len(),
            "writing column back"
        );
        handle.write_column(&self.sheet_name, position + 1, self.start_row, &values)
    }
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

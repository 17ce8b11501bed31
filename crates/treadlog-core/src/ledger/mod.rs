//! Per-shoe, per-year mileage ledger.
//!
//! Each equipment row carries a serialised year -> miles map in one column of
//! the equipment sheet. Cumulative figures are never stored on their own:
//! `residual` sums the buckets before a year on demand, and `total` writes
//! that sum plus the current year's miles into the YTD column.

pub mod codec;

use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::errors::{TrackerError, TrackerResult};
use crate::models::{ColumnRef, ShoeRef};
use crate::registry::EquipmentRegistry;

pub use codec::YearMileageMap;

/// Years at or before this one predate the ledger.
pub const LEDGER_EPOCH_YEAR: i32 = 2020;

fn check_year(year: i32) -> TrackerResult<()> {
    if year <= LEDGER_EPOCH_YEAR {
        return Err(TrackerError::Precondition(format!(
            "year must be after {LEDGER_EPOCH_YEAR}, got {year}"
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct YearlyTotalsLedger<'a> {
    registry: &'a mut EquipmentRegistry,
    column: ColumnRef,
    ytd_column: ColumnRef,
    years: Vec<Option<YearMileageMap>>,
}

impl<'a> YearlyTotalsLedger<'a> {
    /// A ledger over `column`, writing year-to-date figures to `YTD`.
    pub fn new(registry: &'a mut EquipmentRegistry, column: impl Into<ColumnRef>) -> Self {
        let rows = registry.len();
        Self {
            registry,
            column: column.into(),
            ytd_column: ColumnRef::Name(TrackerConfig::default().ytd_column),
            years: vec![None; rows],
        }
    }

    pub fn from_config(registry: &'a mut EquipmentRegistry, config: &TrackerConfig) -> Self {
        let mut ledger = Self::new(registry, config.ledger_column.clone());
        ledger.ytd_column = ColumnRef::Name(config.ytd_column.clone());
        ledger
    }

    pub fn registry(&self) -> &EquipmentRegistry {
        self.registry
    }

    /// Deserialise every row's ledger cell. Blank cells become empty maps.
    pub fn load(&mut self) -> TrackerResult<()> {
        let table = self.registry.table();
        let position = table.resolve(&self.column)?;
        let mut years = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let map = codec::decode(table.cell(row, position)).map_err(|e| {
                TrackerError::Schema(format!("row {row} of ledger column {}: {e}", self.column))
            })?;
            years.push(Some(map));
        }
        info!(rows = years.len(), column = %self.column, "ledger loaded");
        self.years = years;
        Ok(())
    }

    /// The loaded map for one row, if any.
    pub fn year_map(&self, row: usize) -> Option<&YearMileageMap> {
        self.years.get(row).and_then(Option::as_ref)
    }

    fn row_for<'s>(&self, shoe: ShoeRef<'s>) -> TrackerResult<usize> {
        let row = match shoe {
            ShoeRef::Name(name) => self.registry.row_index_for_name(name)?,
            ShoeRef::Row(row) => row,
        };
        if row >= self.years.len() {
            return Err(TrackerError::NotFound(format!(
                "ledger row {row} out of range ({} rows)",
                self.years.len()
            )));
        }
        Ok(row)
    }

    fn loaded(&self, row: usize) -> TrackerResult<&YearMileageMap> {
        self.year_map(row).ok_or_else(|| {
            TrackerError::Precondition(format!("ledger row {row} has not been loaded"))
        })
    }

    /// Miles logged before `year`.
    pub fn residual<'s>(&self, year: i32, shoe: impl Into<ShoeRef<'s>>) -> TrackerResult<f64> {
        check_year(year)?;
        let row = self.row_for(shoe.into())?;
        let map = self.loaded(row)?;
        Ok(map.range(..year).map(|(_, miles)| miles).sum())
    }

    /// Record `years_total` as the miles for `year` (replacing any earlier
    /// figure for that year), write residual + `years_total` into the YTD
    /// column and return it.
    pub fn total(&mut self, shoe_name: &str, year: i32, years_total: f64) -> TrackerResult<f64> {
        check_year(year)?;
        let row = self.row_for(ShoeRef::Name(shoe_name))?;
        let ytd_position = self.registry.table().resolve(&self.ytd_column)?;

        let map = self.years[row].as_mut().ok_or_else(|| {
            TrackerError::Precondition(format!("ledger row {row} has not been loaded"))
        })?;
        map.insert(year, years_total);
        let combined = years_total + self.residual(year, ShoeRef::Row(row))?;

        self.registry
            .table_mut()
            .set_cell(row, ytd_position, combined.to_string())?;
        debug!(shoe = shoe_name, year, years_total, combined, "year total recorded");
        Ok(combined)
    }

    /// Serialise every loaded map back into the ledger column. Rows that
    /// were never loaded are left as they are.
    pub fn save(&mut self) -> TrackerResult<()> {
        let position = self.registry.table().resolve(&self.column)?;
        for (row, years) in self.years.iter().enumerate() {
            if let Some(years) = years {
                let text = codec::encode(years)?;
                self.registry.table_mut().set_cell(row, position, text)?;
            }
        }
        Ok(())
    }

    /// `save`, then write back the ledger column and the YTD column.
    ///
    /// The two writes are independent: a failure on the second leaves the
    /// first in place.
    pub fn push_updates(&mut self) -> TrackerResult<()> {
        self.save()?;
        self.registry.write_back_column(&self.column)?;
        self.registry.write_back_column(&self.ytd_column)?;
        info!(column = %self.column, ytd = %self.ytd_column, "ledger pushed");
        Ok(())
    }
}

//! The per-entry assignment cascade.
//!
//! Evaluated in a fixed order, first hit wins:
//! 1. a remark word naming a shoe (registry rows scanned top-down),
//! 2. the dedicated shoe for the harbour routes after the cutover date,
//! 3. the category's base or new shoe, depending on the entry date.

use chrono::Datelike;
use tracing::{debug, warn};

use super::AssignmentEngine;
use crate::errors::{TrackerError, TrackerResult};
use crate::models::{LogEntry, ROAD_CATEGORY, XC_CATEGORY};
use crate::registry::findwords;
use crate::registry::keywords::XC_TOKEN;

/// `XC` when the remarks mention xc anywhere (any case), else `Road`.
pub fn category_for_remarks(remarks: &str) -> &'static str {
    if remarks.to_lowercase().contains(XC_TOKEN) {
        XC_CATEGORY
    } else {
        ROAD_CATEGORY
    }
}

impl<'r> AssignmentEngine<'r> {
    /// Name the equipment used for one log entry.
    pub fn assign_name(&self, entry: &LogEntry) -> TrackerResult<&'r str> {
        if entry.date.year() != self.tracked_year {
            warn!(date = %entry.date, tracked_year = self.tracked_year, "entry outside tracked year");
        }

        let remark_words = findwords(&entry.remarks);
        if !remark_words.is_empty() {
            for record in self.registry.records() {
                if !record.keywords.is_disjoint(&remark_words) {
                    debug!(row = record.index, ?remark_words, "assigned from remarks");
                    return Ok(self.registry.name_for_row_index(record.index)?);
                }
            }
        }

        let route_words = findwords(&entry.route);
        if entry.date > self.route_cutover
            && route_words.iter().any(|w| self.route_locations.contains(w))
        {
            let record = self.registry.resolve(&self.route_equipment)?;
            debug!(row = record.index, ?route_words, "assigned from route");
            return Ok(self.registry.name_for_row_index(record.index)?);
        }

        let category = category_for_remarks(&entry.remarks);
        let base = self.base_equipment()?.get(category);
        let new = self.new_equipment()?.get(category);

        let row = match (base, new) {
            (Some(base), Some(new)) if new.start_date > base.start_date => {
                if entry.date < new.start_date {
                    debug!(category, "assigned base, before new arrived");
                    base.row_index
                } else {
                    debug!(category, "assigned new");
                    new.row_index
                }
            }
            (Some(base), _) => {
                debug!(category, "assigned base");
                base.row_index
            }
            // First ever item(s) of this category arrived during the year:
            // the earliest of them stands in for the base pick.
            (None, Some(new)) => match self.first_of_year(category)? {
                Some(first) if entry.date < new.start_date => {
                    debug!(category, "assigned first of year, before new arrived");
                    first.row_index
                }
                _ => {
                    debug!(category, "assigned new");
                    new.row_index
                }
            },
            (None, None) => {
                return Err(TrackerError::NotFound(format!(
                    "no {category} equipment in use by the end of {}",
                    self.tracked_year
                )))
            }
        };
        Ok(self.registry.name_for_row_index(row)?)
    }

    /// Assign every entry, in order.
    pub fn assign_all(&self, entries: &[LogEntry]) -> TrackerResult<Vec<&'r str>> {
        entries.iter().map(|entry| self.assign_name(entry)).collect()
    }
}

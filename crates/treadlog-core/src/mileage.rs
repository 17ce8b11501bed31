//! Weekly mileage roll-up: parse a year's log sheet, assign a shoe to every
//! run, and sum miles per shoe ready for the ledger.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::dates::parse_day_first;
use crate::engine::AssignmentEngine;
use crate::errors::{TrackerError, TrackerResult};
use crate::ledger::YearlyTotalsLedger;
use crate::models::{LogEntry, Table, REMARKS_COLUMN, ROUTE_COLUMN};

static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9.]+$").unwrap());

/// Miles from a distance cell. Blanks, formulas, notes and anything else
/// that is not a plain decimal count as zero.
pub fn parse_distance(text: &str) -> f64 {
    let trimmed = text.trim();
    if !DECIMAL_RE.is_match(trimmed) {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(0.0)
}

/// Turn a log sheet into entries. The first column holds the day-first run
/// date; rows with a blank date (unfilled skeleton rows) are skipped.
pub fn parse_log(table: &Table, distance_column: &str) -> TrackerResult<Vec<LogEntry>> {
    let distance = table.column_position(distance_column).ok_or_else(|| {
        TrackerError::Schema(format!("log sheet has no {distance_column:?} column"))
    })?;
    let remarks = table.column_position(REMARKS_COLUMN);
    let route = table.column_position(ROUTE_COLUMN);
    let text_at = |row: usize, col: Option<usize>| col.map_or("", |c| table.cell(row, c));

    let mut entries = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let date_text = table.cell(row, 0);
        if date_text.trim().is_empty() {
            warn!(row, "skipping log row with no date");
            continue;
        }
        let date = parse_day_first(date_text)?;
        entries.push(
            LogEntry::new(date, text_at(row, remarks), text_at(row, route))
                .with_miles(parse_distance(table.cell(row, distance))),
        );
    }
    Ok(entries)
}

/// [`parse_log`] with the distance column named in `config`.
pub fn parse_log_with_config(
    table: &Table,
    config: &TrackerConfig,
) -> TrackerResult<Vec<LogEntry>> {
    parse_log(table, &config.distance_column)
}

/// Which year's sheet a weekly run should work on.
///
/// A week inside one year uses that year. A week straddling New Year keeps
/// working on the old year while today is still in it (or on the 1st of a
/// month, when the last week is usually being closed off), and otherwise
/// moves on to the new one.
pub fn tracking_year_for_week(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> i32 {
    if start.year() == end.year() {
        return end.year();
    }
    if today.year() == start.year() || today.day() == 1 {
        start.year()
    } else {
        end.year()
    }
}

/// Miles per shoe for one log, plus overall and weekly totals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MileageTally {
    pub total: f64,
    pub week_total: f64,
    /// Keyed by equipment name in first-seen order.
    pub per_shoe: IndexMap<String, f64>,
}

impl MileageTally {
    /// Assign every entry and add up its miles. `week` is an inclusive date
    /// range for the weekly figure.
    pub fn build(
        engine: &AssignmentEngine<'_>,
        entries: &[LogEntry],
        week: Option<(NaiveDate, NaiveDate)>,
    ) -> TrackerResult<Self> {
        let mut tally = Self::default();
        for entry in entries {
            let shoe = engine.assign_name(entry)?;
            *tally.per_shoe.entry(shoe.to_string()).or_insert(0.0) += entry.miles;
            tally.total += entry.miles;
            if let Some((start, end)) = week {
                if entry.date >= start && entry.date <= end {
                    tally.week_total += entry.miles;
                }
            }
        }
        debug!(shoes = tally.per_shoe.len(), total = tally.total, "mileage tallied");
        Ok(tally)
    }

    /// Each shoe's year figure plus everything it ran in earlier years.
    pub fn with_residuals(
        &self,
        ledger: &YearlyTotalsLedger<'_>,
        year: i32,
    ) -> TrackerResult<IndexMap<String, f64>> {
        self.per_shoe
            .iter()
            .map(|(shoe, miles)| Ok((shoe.clone(), miles + ledger.residual(year, shoe.as_str())?)))
            .collect()
    }

    /// Record every shoe's year figure in the ledger and return the
    /// resulting year-to-date totals.
    pub fn apply(
        &self,
        ledger: &mut YearlyTotalsLedger<'_>,
        year: i32,
    ) -> TrackerResult<IndexMap<String, f64>> {
        let mut totals = IndexMap::with_capacity(self.per_shoe.len());
        for (shoe, miles) in &self.per_shoe {
            totals.insert(shoe.clone(), ledger.total(shoe, year, *miles)?);
        }
        Ok(totals)
    }
}

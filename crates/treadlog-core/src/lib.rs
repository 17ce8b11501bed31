//! Treadlog core library. Works out which shoes were worn for each run in
//! a running log and keeps per-shoe mileage totals across years.
//!
//! The crate is built bottom-up from three components:
//!
//! - [`registry::EquipmentRegistry`] owns the equipment sheet and the keyword
//!   set derived from each shoe's name.
//! - [`ledger::YearlyTotalsLedger`] keeps a year -> miles map per shoe and
//!   computes residual and year-to-date totals.
//! - [`engine::AssignmentEngine`] picks the base and new shoe per category for
//!   a tracked year and names the shoe for each log entry.
//!
//! Sheets arrive already materialised as [`models::Table`]s; writes go back
//! through a [`store::SheetStore`] handle.

pub mod config;
pub mod dates;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod mileage;
pub mod models;
pub mod registry;
pub mod store;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use config::TrackerConfig;
pub use engine::{AssignmentEngine, NameMap};
pub use errors::{TrackerError, TrackerResult};
pub use ledger::YearlyTotalsLedger;
pub use mileage::MileageTally;
pub use models::{LogEntry, Table};
pub use registry::EquipmentRegistry;

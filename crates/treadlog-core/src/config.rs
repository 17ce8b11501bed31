//! Tracker configuration: column names, write-back placement, and the
//! hand-curated route override.
//!
//! Every field has a default so a partial JSON document (or none at all) is
//! enough. Two environment switches are honoured: `TREADLOG_CONFIG` names a
//! JSON file to load, and `TREADLOG_YEAR` pins the tracked year.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dates::current_year;
use crate::errors::TrackerResult;
use crate::models::{ColumnRef, EquipmentRef};

pub const CONFIG_PATH_ENV: &str = "TREADLOG_CONFIG";
pub const TRACKED_YEAR_ENV: &str = "TREADLOG_YEAR";

/// Route locations that were always run in one dedicated pair of shoes.
pub const DEFAULT_ROUTE_LOCATIONS: [&str; 5] = ["upton", "holes", "hamworthy", "baiter", "sandbanks"];

/// Applies to runs strictly after `cutover` whose route mentions one of
/// `locations`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOverride {
    pub cutover: NaiveDate,
    pub locations: Vec<String>,
    pub equipment: EquipmentRef,
}

impl Default for RouteOverride {
    fn default() -> Self {
        Self {
            cutover: NaiveDate::from_ymd_opt(2021, 8, 2).expect("valid calendar date"),
            locations: DEFAULT_ROUTE_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            equipment: EquipmentRef::Row(3),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Column holding the serialised year -> miles map for each shoe.
    pub ledger_column: ColumnRef,
    pub ytd_column: String,
    /// Tab that column write-backs are scoped to.
    pub equipment_sheet: String,
    /// First data row for write-backs (one header row plus one base row).
    pub write_back_start_row: usize,
    /// Log sheet column read as miles.
    pub distance_column: String,
    pub tracked_year: Option<i32>,
    pub route_override: RouteOverride,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            ledger_column: ColumnRef::Position(6),
            ytd_column: "YTD".to_string(),
            equipment_sheet: "Shoes".to_string(),
            write_back_start_row: 2,
            distance_column: "Distance miles".to_string(),
            tracked_year: None,
            route_override: RouteOverride::default(),
        }
    }
}

impl TrackerConfig {
    pub fn from_json_str(text: &str) -> TrackerResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> TrackerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Load from `TREADLOG_CONFIG` when set, otherwise use the defaults.
    pub fn from_env() -> TrackerResult<Self> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// The configured year, then `TREADLOG_YEAR`, then the current year.
    pub fn resolve_tracked_year(&self) -> i32 {
        if let Some(year) = self.tracked_year {
            return year;
        }
        match std::env::var(TRACKED_YEAR_ENV) {
            Ok(val) => match val.trim().parse::<i32>() {
                Ok(year) => year,
                Err(_) => {
                    warn!("ignoring unparseable {TRACKED_YEAR_ENV}={val:?}");
                    current_year()
                }
            },
            Err(_) => current_year(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.ledger_column, ColumnRef::Position(6));
        assert_eq!(config.ytd_column, "YTD");
        assert_eq!(config.equipment_sheet, "Shoes");
        assert_eq!(config.write_back_start_row, 2);
        assert_eq!(config.route_override.equipment, EquipmentRef::Row(3));
        assert_eq!(
            config.route_override.cutover,
            NaiveDate::from_ymd_opt(2021, 8, 2).unwrap()
        );
        assert!(config
            .route_override
            .locations
            .contains(&"sandbanks".to_string()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TrackerConfig::from_json_str(
            r#"{"ytd_column": "Total", "route_override": {"equipment": {"name": "Poole shoe"}}}"#,
        )
        .unwrap();
        assert_eq!(config.ytd_column, "Total");
        assert_eq!(
            config.route_override.equipment,
            EquipmentRef::Name("Poole shoe".to_string())
        );
        assert_eq!(config.route_override.locations.len(), 5);
        assert_eq!(config.ledger_column, ColumnRef::Position(6));
    }

    #[test]
    fn test_ledger_column_by_name() {
        let config = TrackerConfig::from_json_str(r#"{"ledger_column": {"name": "Years"}}"#).unwrap();
        assert_eq!(config.ledger_column, ColumnRef::Name("Years".to_string()));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treadlog.json");
        std::fs::write(&path, r#"{"tracked_year": 2023, "equipment_sheet": "Copy of Shoes"}"#)
            .unwrap();
        let config = TrackerConfig::from_path(&path).unwrap();
        assert_eq!(config.resolve_tracked_year(), 2023);
        assert_eq!(config.equipment_sheet, "Copy of Shoes");
    }

    #[test]
    fn test_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.json");
        std::fs::write(&path, r#"{"distance_column": "Distance km"}"#).unwrap();

        std::env::set_var(CONFIG_PATH_ENV, &path);
        let loaded = TrackerConfig::from_env();
        std::env::remove_var(CONFIG_PATH_ENV);
        assert_eq!(loaded.unwrap().distance_column, "Distance km");

        assert_eq!(TrackerConfig::from_env().unwrap(), TrackerConfig::default());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(TrackerConfig::from_json_str("{not json").is_err());
    }
}

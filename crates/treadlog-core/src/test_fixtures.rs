//! Sheet fixtures shared by the unit tests.

use chrono::NaiveDate;

use crate::models::Table;

pub const EQUIPMENT_COLUMNS: [&str; 8] = [
    "Start Date",
    "Type",
    "Name",
    "Brand",
    "Retired",
    "Notes",
    "Years",
    "YTD",
];

/// Position of the serialised year map in [`EQUIPMENT_COLUMNS`].
pub const YEARS_COLUMN: usize = 6;

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The equipment tab. Row order matters: remarks keywords are matched
/// top-down, and row 3 is the dedicated harbour-route shoe.
pub fn shoe_table() -> Table {
    Table::from_strs(
        &EQUIPMENT_COLUMNS,
        &[
            &["01/06/2019", "XC", "StolenKoa", "Saucony", "yes", "stolen", "2021: 0.0\n", "0"],
            &["15/07/2020", "XC", "Koa XC", "Saucony", "yes", "", "2021: 181.0\n2022: 200.0\n", "0"],
            &["26/02/2021", "XC", "Merrell XC", "Merrell", "", "", "2021: 305.0\n2022: 200.0\n", "0"],
            &["01/03/2020", "Road", "ASICS-GT1000-9", "ASICS", "", "harbour", "2021: 124.5\n2022: 200.0\n", "0"],
            &["02/08/2021", "Road", "ASICS-GT1000-8", "ASICS", "", "", "2021: 112.0\n2022: 200.0\n", "0"],
            &["01/06/2023", "Road", "ASICS-GT1000-10", "ASICS", "", "", "", "0"],
            &["15/09/2023", "Road", "ASICS-GT2000-11", "ASICS", "", "", "", "0"],
            &["01/04/2022", "Track", "Nike Zoom Rival", "Nike", "", "spikes", "2022: 40.5\n", "0"],
            &["03/01/2023", "XC", "2023Inov8 X-Talon", "Inov8", "", "", "2022: 0\n", "0"],
        ],
    )
}

pub const LOG_COLUMNS: [&str; 4] = ["Date", "Distance miles", "Remarks", "Route"];

/// Thirty consecutive January days of 2023, one run each.
///
/// Most rows are plain road runs; a handful carry remarks or routes that
/// trigger the other assignment rules.
pub fn log_table_2023() -> Table {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for i in 0..30u32 {
        let date = format!("{:02}/01/2023", i + 1);
        let (miles, remarks, route) = match i {
            1 => ("4.0", "xc league", "Upton Country Park"),
            3 => ("6.5", "xc league", "Canford Heath"),
            10 => ("5.0", "", "Sandbanks and back"),
            15 => ("3.0", "muddy, merrell", "Canford Heath"),
            29 => ("n/a", "rest", ""),
            _ => ("5.0", "", "Canford Heath"),
        };
        rows.push(vec![
            date,
            miles.to_string(),
            remarks.to_string(),
            route.to_string(),
        ]);
    }
    Table::new(LOG_COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

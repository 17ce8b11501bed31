//! Day-first date parsing for sheet text.
//!
//! Sheet dates are always `DD/MM/YYYY` (separators `/`, `-` or `.`), never
//! month-first. ISO `YYYY-MM-DD` is also accepted since it cannot be confused
//! with either. A trailing time-of-day component is ignored. Two-digit years
//! land in the century window centred on the current year, so `99` read in
//! 2026 is 1999 and `23` is 2023.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::errors::{TrackerError, TrackerResult};

static DAY_FIRST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{2}|\d{4})$").unwrap());
static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap());

/// Parse day-first date text into a calendar date.
pub fn parse_day_first(text: &str) -> TrackerResult<NaiveDate> {
    let date_part = text.split_whitespace().next().unwrap_or("");
    let invalid = || TrackerError::InvalidDate(format!("{text:?} is not a day-first date"));

    let group = |caps: &regex::Captures<'_>, i: usize| -> String {
        caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default()
    };
    let (year, month, day) = if let Some(caps) = ISO_RE.captures(date_part) {
        (group(&caps, 1), group(&caps, 2), group(&caps, 3))
    } else if let Some(caps) = DAY_FIRST_RE.captures(date_part) {
        (group(&caps, 3), group(&caps, 2), group(&caps, 1))
    } else {
        return Err(invalid());
    };

    let two_digit = year.len() == 2;
    let mut year: i32 = year.parse().map_err(|_| invalid())?;
    if two_digit {
        year = expand_two_digit_year(year, current_year());
    }
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Place `yy` (0..=99) within fifty years either side of `this_year`.
pub fn expand_two_digit_year(yy: i32, this_year: i32) -> i32 {
    let year = this_year.div_euclid(100) * 100 + yy;
    if year >= this_year + 50 {
        year - 100
    } else if year < this_year - 50 {
        year + 100
    } else {
        year
    }
}

/// 31 December of `year`, the inclusive cutoff used for per-year views.
pub fn end_of_year(year: i32) -> TrackerResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| TrackerError::Precondition(format!("year {year} is out of range")))
}

/// The calendar year of today's local date.
pub fn current_year() -> i32 {
    chrono::Local::now().date_naive().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_comes_first() {
        assert_eq!(parse_day_first("02/08/2021").unwrap(), ymd(2021, 8, 2));
        assert_eq!(parse_day_first("1/6/2019").unwrap(), ymd(2019, 6, 1));
    }

    #[test]
    fn test_alternative_separators() {
        assert_eq!(parse_day_first("26-02-2021").unwrap(), ymd(2021, 2, 26));
        assert_eq!(parse_day_first("26.02.2021").unwrap(), ymd(2021, 2, 26));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_day_first("03/01/23").unwrap(), ymd(2023, 1, 3));
        let this_year = current_year();
        let far = (this_year + 60).rem_euclid(100);
        let parsed = parse_day_first(&format!("03/01/{far:02}")).unwrap();
        assert!(parsed.year() < this_year);
    }

    #[test]
    fn test_two_digit_year_window() {
        assert_eq!(expand_two_digit_year(99, 2026), 1999);
        assert_eq!(expand_two_digit_year(23, 2026), 2023);
        assert_eq!(expand_two_digit_year(75, 2026), 2075);
        assert_eq!(expand_two_digit_year(76, 2026), 1976);
        assert_eq!(expand_two_digit_year(5, 2090), 2105);
        assert_eq!(expand_two_digit_year(0, 2000), 2000);
    }

    #[test]
    fn test_iso_and_trailing_time() {
        assert_eq!(parse_day_first("2023-06-01").unwrap(), ymd(2023, 6, 1));
        assert_eq!(
            parse_day_first("15/09/2023 00:00:00").unwrap(),
            ymd(2023, 9, 15)
        );
    }

    #[test]
    fn test_month_first_text_is_rejected_when_impossible() {
        // 13th month only makes sense month-first.
        assert!(matches!(
            parse_day_first("08/13/2021"),
            Err(TrackerError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_day_first("").is_err());
        assert!(parse_day_first("yesterday").is_err());
    }

    #[test]
    fn test_end_of_year() {
        assert_eq!(end_of_year(2022).unwrap(), ymd(2022, 12, 31));
    }
}

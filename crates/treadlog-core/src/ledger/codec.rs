//! YAML encoding of a shoe's year -> miles map.
//!
//! One mapping per sheet cell, e.g. `2022: 0.0\n2023: 200.0\n`. A blank or
//! `null` cell means nothing has been recorded yet.

use std::collections::BTreeMap;

use crate::errors::TrackerResult;

/// Miles logged per calendar year for one piece of equipment.
pub type YearMileageMap = BTreeMap<i32, f64>;

pub fn decode(text: &str) -> TrackerResult<YearMileageMap> {
    if text.trim().is_empty() {
        return Ok(YearMileageMap::new());
    }
    let parsed: Option<YearMileageMap> = serde_yaml::from_str(text)?;
    Ok(parsed.unwrap_or_default())
}

pub fn encode(years: &YearMileageMap) -> TrackerResult<String> {
    Ok(serde_yaml::to_string(years)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integer_and_float_miles() {
        let years = decode("2022: 0\n2023: 200.5\n").unwrap();
        assert_eq!(years.get(&2022), Some(&0.0));
        assert_eq!(years.get(&2023), Some(&200.5));
    }

    #[test]
    fn test_decode_flow_style() {
        let years = decode("{2021: 181.0, 2022: 200.0}").unwrap();
        assert_eq!(years.len(), 2);
        assert_eq!(years[&2021], 181.0);
    }

    #[test]
    fn test_blank_and_null_are_empty() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("  \n").unwrap().is_empty());
        assert!(decode("null").unwrap().is_empty());
        assert!(decode("{}").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_text_is_an_error() {
        assert!(decode("2022: [lots").is_err());
        assert!(decode("not a mapping").is_err());
    }

    #[test]
    fn test_encode_is_readable() {
        let mut years = YearMileageMap::new();
        years.insert(2023, 200.0);
        years.insert(2022, 0.0);
        let text = encode(&years).unwrap();
        assert_eq!(text, "2022: 0.0\n2023: 200.0\n");
        assert_eq!(decode(&text).unwrap(), years);
    }
}

//! Calendar dates as stored (`yyyy-mm-dd`) and as displayed (`dd/mm/yyyy`).

use chrono::NaiveDate;

pub const STORAGE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Accepts either the stored or the display form.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, STORAGE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DISPLAY_FORMAT))
        .ok()
}

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Serde adapter writing `yyyy-mm-dd` and reading either form, so blobs with
/// imported display-form dates still load.
pub mod flexible {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::{parse_date, STORAGE_FORMAT};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(STORAGE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(parse_date("2025-03-07"), Some(expected));
        assert_eq!(parse_date("07/03/2025"), Some(expected));
        assert_eq!(parse_date(" 07/03/2025\r"), Some(expected));
        assert_eq!(parse_date("March 7"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn displays_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(display_date(date), "01/12/2024");
    }
}

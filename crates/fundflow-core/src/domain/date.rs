use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

/// Date layout used by the AMFI NAV feed. Day and month may be unpadded.
const SOURCE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day padding:none]-[month padding:none]-[year]");
/// Date layout used in persisted series and JSON output.
const ISO_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date of a NAV observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavDate(Date);

impl NavDate {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parse the feed's `DD-MM-YYYY` layout.
    pub fn parse_source(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), SOURCE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
                expected: "DD-MM-YYYY",
            })
    }

    /// Parse the persisted `YYYY-MM-DD` layout.
    pub fn parse_iso(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), ISO_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
                expected: "YYYY-MM-DD",
            })
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    /// Whole calendar days from `self` to `later`; negative when `later` is earlier.
    pub fn days_until(self, later: Self) -> i64 {
        (later.0 - self.0).whole_days()
    }

    /// Date `days` calendar days earlier, saturating at the minimum representable date.
    pub fn minus_days(self, days: u32) -> Self {
        let shifted = self
            .0
            .checked_sub(time::Duration::days(i64::from(days)))
            .unwrap_or(Date::MIN);
        Self(shifted)
    }

    pub fn format_iso(self) -> String {
        let (year, month, day) = self.0.to_calendar_date();
        format!("{year:04}-{:02}-{day:02}", u8::from(month))
    }
}

impl Display for NavDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for NavDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for NavDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse_iso(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn parses_source_layout() {
        let parsed = NavDate::parse_source("05-01-2024").expect("must parse");
        assert_eq!(parsed.into_inner(), date!(2024 - 01 - 05));
        assert_eq!(parsed.format_iso(), "2024-01-05");
    }

    #[test]
    fn accepts_unpadded_day_and_month() {
        let unpadded = NavDate::parse_source("1-1-2024").expect("unpadded");
        let mixed = NavDate::parse_source("5-01-2024").expect("mixed");
        assert_eq!(unpadded.into_inner(), date!(2024 - 01 - 01));
        assert_eq!(mixed.into_inner(), date!(2024 - 01 - 05));
    }

    #[test]
    fn rejects_iso_layout_in_source_position() {
        let err = NavDate::parse_source("2024-01-05").expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::InvalidDate {
                expected: "DD-MM-YYYY",
                ..
            }
        ));
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert!(NavDate::parse_source("31-02-2023").is_err());
        assert!(NavDate::parse_iso("2023-13-01").is_err());
    }

    #[test]
    fn counts_days_across_leap_year() {
        let start = NavDate::parse_iso("2020-01-01").expect("start");
        let end = NavDate::parse_iso("2021-01-01").expect("end");
        assert_eq!(start.days_until(end), 366);
        assert_eq!(end.days_until(start), -366);
        assert_eq!(end.minus_days(366), start);
    }
}

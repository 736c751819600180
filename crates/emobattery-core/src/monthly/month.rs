//! Calendar month value (`YYYY-MM`).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    first_day: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    /// The month a day falls in.
    pub fn containing(day: NaiveDate) -> Self {
        Self {
            first_day: day.with_day(1).unwrap_or(day),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Every calendar day of the month, in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        let next = self
            .first_day
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        self.first_day
            .iter_days()
            .take_while(|day| *day < next)
            .collect()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        Month::containing(day) == *self
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ValidationError::InvalidMonth(trimmed.to_string());

        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let month: Month = "2025-07".parse().unwrap();
        assert_eq!(month.year(), 2025);
        assert_eq!(month.month(), 7);
        assert_eq!(month.to_string(), "2025-07");
    }

    #[test]
    fn rejects_invalid_months() {
        for raw in ["2025-13", "2025-00", "2025-7", "25-07", "2025/07", "", "2025-07-01", "abcd-ef"] {
            assert_eq!(
                raw.parse::<Month>(),
                Err(ValidationError::InvalidMonth(raw.to_string())),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn enumerates_days() {
        assert_eq!("2025-02".parse::<Month>().unwrap().days().len(), 28);
        assert_eq!("2024-02".parse::<Month>().unwrap().days().len(), 29);
        let december = "2025-12".parse::<Month>().unwrap().days();
        assert_eq!(december.len(), 31);
        assert_eq!(december[30], NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn containing_and_contains() {
        let day = NaiveDate::from_ymd_opt(2025, 7, 21).unwrap();
        let month = Month::containing(day);
        assert_eq!(month.to_string(), "2025-07");
        assert!(month.contains(day));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()));
    }
}

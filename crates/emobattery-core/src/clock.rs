//! Source of "now" for deciding which day is today.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Wall-clock reading in the calendar the battery is computed in.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Calendar used to decide what "today" is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneSetting {
    /// The machine's local time zone.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => f.write_str("local"),
            TimeZoneSetting::Utc => f.write_str("utc"),
            TimeZoneSetting::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for TimeZoneSetting {
    type Err = ValidationError;

    /// `local`, `utc`, or an offset such as `+08:00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "local" => Ok(TimeZoneSetting::Local),
            "utc" | "z" => Ok(TimeZoneSetting::Utc),
            _ => trimmed
                .parse::<FixedOffset>()
                .map(TimeZoneSetting::Fixed)
                .map_err(|_| ValidationError::InvalidValue {
                    field: "clock.timezone".to_string(),
                    message: format!("'{trimmed}' is not local, utc or an offset like +08:00"),
                }),
        }
    }
}

impl Serialize for TimeZoneSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeZoneSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Reads the system clock in the configured calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub timezone: TimeZoneSetting,
}

impl SystemClock {
    pub fn new(timezone: TimeZoneSetting) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.timezone {
            TimeZoneSetting::Local => Local::now().naive_local(),
            TimeZoneSetting::Utc => Utc::now().naive_utc(),
            TimeZoneSetting::Fixed(offset) => Utc::now().with_timezone(&offset).naive_local(),
        }
    }
}

/// Always returns the same moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn parses_timezone_settings() {
        assert_eq!("local".parse::<TimeZoneSetting>().unwrap(), TimeZoneSetting::Local);
        assert_eq!("UTC".parse::<TimeZoneSetting>().unwrap(), TimeZoneSetting::Utc);
        let fixed = "+08:00".parse::<TimeZoneSetting>().unwrap();
        assert_eq!(
            fixed,
            TimeZoneSetting::Fixed(FixedOffset::east_opt(8 * 3600).unwrap())
        );
        assert_eq!(fixed.to_string(), "+08:00");
        assert!("mars".parse::<TimeZoneSetting>().is_err());
    }

    #[test]
    fn fixed_clock_is_fixed() {
        let moment = NaiveDate::from_ymd_opt(2025, 7, 21)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let clock = FixedClock(moment);
        assert_eq!(clock.now(), moment);
        assert_eq!((&clock).now(), moment);
    }

    #[test]
    fn fixed_offset_clock_tracks_utc() {
        let utc = SystemClock::new(TimeZoneSetting::Utc).now();
        let plus_two = SystemClock::new("+02:00".parse().unwrap()).now();
        let delta = plus_two - utc;
        assert!((delta.num_minutes() - 120).abs() <= 1);
    }
}

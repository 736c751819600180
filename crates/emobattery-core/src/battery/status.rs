//! Headline battery figures for "today".

use serde::{Deserialize, Serialize};

use super::simulator::DayBatterySeries;

/// Level reported when today has no reached bin.
pub const DEFAULT_TODAY_LEVEL: u32 = 80;

/// Coarse battery tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryStatus {
    Excellent,
    Good,
    Fair,
    Low,
}

impl BatteryStatus {
    pub fn from_level(level: u32) -> Self {
        match level {
            80..=u32::MAX => BatteryStatus::Excellent,
            60..=79 => BatteryStatus::Good,
            40..=59 => BatteryStatus::Fair,
            _ => BatteryStatus::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BatteryStatus::Excellent => "Excellent",
            BatteryStatus::Good => "Good",
            BatteryStatus::Fair => "Fair",
            BatteryStatus::Low => "Low",
        }
    }
}

/// Today's headline level: the bin containing "now", else the last reached
/// bin, else [`DEFAULT_TODAY_LEVEL`].
pub fn today_level(series: &DayBatterySeries) -> u32 {
    series
        .current_level
        .or_else(|| series.reached().last().map(|p| p.level))
        .unwrap_or(DEFAULT_TODAY_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::{simulate_day, BatteryConfig};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn status_tiers() {
        assert_eq!(BatteryStatus::from_level(100), BatteryStatus::Excellent);
        assert_eq!(BatteryStatus::from_level(80), BatteryStatus::Excellent);
        assert_eq!(BatteryStatus::from_level(79), BatteryStatus::Good);
        assert_eq!(BatteryStatus::from_level(60), BatteryStatus::Good);
        assert_eq!(BatteryStatus::from_level(40), BatteryStatus::Fair);
        assert_eq!(BatteryStatus::from_level(39), BatteryStatus::Low);
        assert_eq!(BatteryStatus::from_level(0).label(), "Low");
    }

    #[test]
    fn today_level_fallbacks() {
        let day = NaiveDate::from_ymd_opt(2025, 7, 21).unwrap();
        let config = BatteryConfig::default();
        let at = |h, m| day.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap());

        let morning = simulate_day(day, &[], &config, at(7, 30));
        assert_eq!(today_level(&morning), DEFAULT_TODAY_LEVEL);

        let midday = simulate_day(day, &[], &config, at(12, 0));
        assert_eq!(Some(today_level(&midday)), midday.current_level);

        let evening = simulate_day(day, &[], &config, at(19, 0));
        assert_eq!(evening.current_level, None);
        assert_eq!(today_level(&evening), 60);
    }
}

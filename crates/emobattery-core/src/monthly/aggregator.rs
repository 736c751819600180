//! Monthly battery averages with a self-healing cache.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::month::Month;
use crate::battery::{simulate_day, BatteryConfig, DayBatterySeries};
use crate::clock::Clock;
use crate::emotion::{observations_from_rows, parse_day};
use crate::error::{Result, ValidationError};
use crate::storage::EmotionStore;

/// Average reported for a day without face observations.
pub const NO_DATA_AVERAGE: f64 = 80.0;

/// One cached row of the monthly table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCacheEntry {
    pub month: Month,
    pub day: NaiveDate,
    /// `None` when the stored value is NULL.
    pub avg_battery: Option<f64>,
    /// Face observations stored for the day when the row was computed.
    /// `None` for rows written before this was tracked.
    pub observation_count: Option<u64>,
}

/// Average battery level of one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAverage {
    pub day: NaiveDate,
    pub avg_battery: f64,
}

impl From<&MonthlyCacheEntry> for DailyAverage {
    fn from(entry: &MonthlyCacheEntry) -> Self {
        Self {
            day: entry.day,
            avg_battery: entry.avg_battery.unwrap_or(NO_DATA_AVERAGE),
        }
    }
}

/// Drives the battery simulator over whole months and keeps the per-day
/// averages cached in the store.
pub struct MonthlyAggregator<S, C> {
    store: S,
    config: BatteryConfig,
    clock: C,
}

impl<S: EmotionStore, C: Clock> MonthlyAggregator<S, C> {
    pub fn new(store: S, config: BatteryConfig, clock: C) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Simulate one day from the store, optionally for a single user.
    pub fn simulate_day(&self, day: NaiveDate, username: Option<&str>) -> Result<DayBatterySeries> {
        let rows = self.store.day_observations(day, username)?;
        let observations = observations_from_rows(rows);
        Ok(simulate_day(day, &observations, &self.config, self.clock.now()))
    }

    /// Like [`Self::simulate_day`] with a caller-supplied `YYYY-MM-DD` or
    /// `YYYYMMDD` day.
    pub fn simulate_day_str(&self, day: &str, username: Option<&str>) -> Result<DayBatterySeries> {
        let day = parse_day(day)?;
        self.simulate_day(day, username)
    }

    /// Today's series in the clock's calendar.
    pub fn simulate_today(&self) -> Result<DayBatterySeries> {
        self.simulate_day(self.clock.now().date(), None)
    }

    /// Per-day averages of `month` (`YYYY-MM`), served from the cache when
    /// possible.
    ///
    /// Cached rows are checked against the record store first: a day that
    /// has lost all its observations is reset to [`NO_DATA_AVERAGE`], and a
    /// day whose observation count differs from the one it was cached with
    /// is recomputed. Corrections are written back.
    pub fn monthly_averages(&self, month: &str) -> Result<Vec<DailyAverage>> {
        let month: Month = month.parse()?;
        self.monthly_averages_for(month)
    }

    pub fn monthly_averages_for(&self, month: Month) -> Result<Vec<DailyAverage>> {
        let cached = self.store.cached_month(month)?;
        if !cached.is_empty() {
            return self.validate_cached(month, cached);
        }

        tracing::info!(month = %month, "computing monthly battery averages");
        let mut rows = Vec::new();
        for day in month.days() {
            let count = self.store.day_observation_count(day)?;
            rows.push(MonthlyCacheEntry {
                month,
                day,
                avg_battery: Some(self.day_average(day, count)?),
                observation_count: Some(count),
            });
        }

        self.store.replace_month_cache(month, &rows)?;
        Ok(rows.iter().map(DailyAverage::from).collect())
    }

    fn validate_cached(
        &self,
        month: Month,
        mut rows: Vec<MonthlyCacheEntry>,
    ) -> Result<Vec<DailyAverage>> {
        let mut dirty = false;

        for row in &mut rows {
            let count = self.store.day_observation_count(row.day)?;

            if count == 0 {
                if row.avg_battery != Some(NO_DATA_AVERAGE) || row.observation_count != Some(0) {
                    tracing::info!(day = %row.day, "resetting cached average of empty day");
                    row.avg_battery = Some(NO_DATA_AVERAGE);
                    row.observation_count = Some(0);
                    dirty = true;
                }
            } else if row.observation_count != Some(count) || row.avg_battery.is_none() {
                let average = self.day_average(row.day, count)?;
                tracing::info!(
                    day = %row.day,
                    count,
                    average,
                    "recomputed cached day whose observations changed"
                );
                row.avg_battery = Some(average);
                row.observation_count = Some(count);
                dirty = true;
            }
        }

        if dirty {
            self.store.replace_month_cache(month, &rows)?;
        } else {
            tracing::debug!(month = %month, "monthly battery cache hit");
        }
        Ok(rows.iter().map(DailyAverage::from).collect())
    }

    /// Average of `day` given its stored face-observation `count`.
    ///
    /// Rows whose timestamps do not parse are stored but never simulated, so
    /// a day holding only such rows averages [`NO_DATA_AVERAGE`] too.
    fn day_average(&self, day: NaiveDate, count: u64) -> Result<f64> {
        if count == 0 {
            return Ok(NO_DATA_AVERAGE);
        }
        let series = self.simulate_day(day, None)?;
        if series.observation_total == 0 {
            return Ok(NO_DATA_AVERAGE);
        }
        Ok(series.average_level().unwrap_or(NO_DATA_AVERAGE))
    }

    /// Drop the cached rows of `month` so the next read recomputes it.
    pub fn clear_month_cache(&self, month: &str) -> Result<()> {
        let month: Month = month.parse()?;
        self.store.clear_month_cache(month)?;
        Ok(())
    }

    /// Mean of the current month's daily averages, clamped to the level bounds.
    pub fn current_month_average(&self) -> Result<u32> {
        let month = Month::containing(self.clock.now().date());
        let averages = self.monthly_averages_for(month)?;
        if averages.is_empty() {
            return Err(ValidationError::InvalidMonth(month.to_string()).into());
        }

        let mean = averages.iter().map(|a| a.avg_battery).sum::<f64>() / averages.len() as f64;
        Ok(self.config.clamp(mean).round() as u32)
    }
}

//! Storage seam used by the monthly aggregator.

use chrono::NaiveDate;

use crate::emotion::RawObservation;
use crate::error::Result;
use crate::monthly::{Month, MonthlyCacheEntry};

/// Read access to emotion records plus the derived monthly cache.
///
/// Implementations report storage failures as errors; they never substitute
/// data.
pub trait EmotionStore {
    /// `(timestamp, emotion)` rows with a detected face recorded on `day`,
    /// optionally limited to one user.
    fn day_observations(&self, day: NaiveDate, username: Option<&str>)
        -> Result<Vec<RawObservation>>;

    /// Number of rows with a detected face recorded on `day`.
    fn day_observation_count(&self, day: NaiveDate) -> Result<u64>;

    /// Cached rows of `month`, ordered by day. Empty when nothing is cached.
    fn cached_month(&self, month: Month) -> Result<Vec<MonthlyCacheEntry>>;

    /// Atomically replace every cached row of `month` with `rows`.
    fn replace_month_cache(&self, month: Month, rows: &[MonthlyCacheEntry]) -> Result<()>;

    /// Delete every cached row of `month`, returning how many were removed.
    fn clear_month_cache(&self, month: Month) -> Result<usize>;
}

impl<S: EmotionStore + ?Sized> EmotionStore for &S {
    fn day_observations(
        &self,
        day: NaiveDate,
        username: Option<&str>,
    ) -> Result<Vec<RawObservation>> {
        (**self).day_observations(day, username)
    }

    fn day_observation_count(&self, day: NaiveDate) -> Result<u64> {
        (**self).day_observation_count(day)
    }

    fn cached_month(&self, month: Month) -> Result<Vec<MonthlyCacheEntry>> {
        (**self).cached_month(month)
    }

    fn replace_month_cache(&self, month: Month, rows: &[MonthlyCacheEntry]) -> Result<()> {
        (**self).replace_month_cache(month, rows)
    }

    fn clear_month_cache(&self, month: Month) -> Result<usize> {
        (**self).clear_month_cache(month)
    }
}

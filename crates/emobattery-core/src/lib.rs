//! # Emotion Battery Core Library
//!
//! Turns a stream of emotion observations into a bounded "battery level"
//! per ten-minute bin of the workday, averages those levels per day over a
//! month, and caches the monthly result. All operations are available via
//! the standalone `emobattery` CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Emotion**: label normalization onto six canonical categories and the
//!   record timestamp boundary
//! - **Battery**: the per-day decay/impact simulation
//! - **Monthly**: month-wide aggregation with a self-healing SQLite cache
//! - **Storage**: SQLite record store, migrations and TOML configuration
//!
//! ## Key Components
//!
//! - [`simulate_day`]: Battery series for one day
//! - [`MonthlyAggregator`]: Monthly averages, cache invalidation
//! - [`Database`]: Record store and cache persistence
//! - [`Config`]: Application configuration management

pub mod battery;
pub mod clock;
pub mod emotion;
pub mod error;
pub mod monthly;
pub mod storage;

pub use battery::{
    simulate_day, today_level, BatteryConfig, BatteryPoint, BatteryStatus, DayBatterySeries,
    EmotionWeights, TimeBin,
};
pub use clock::{Clock, FixedClock, SystemClock, TimeZoneSetting};
pub use emotion::{normalize, EmotionCategory, EmotionObservation, NormalizedEmotion};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use monthly::{DailyAverage, Month, MonthlyAggregator, MonthlyCacheEntry, NO_DATA_AVERAGE};
pub use storage::{Config, Database, EmotionStore, NewEmotionRecord};

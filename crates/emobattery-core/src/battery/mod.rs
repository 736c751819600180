//! Emotion battery model.
//!
//! Turns a day of emotion observations into a per-bin battery level series.

mod config;
mod simulator;
mod status;

pub use config::{hhmm, parse_hhmm, BatteryConfig, EmotionWeights};
pub use simulator::{generate_bins, simulate_day, BatteryPoint, DayBatterySeries, TimeBin};
pub use status::{today_level, BatteryStatus, DEFAULT_TODAY_LEVEL};

pub(crate) use simulator::round_one_decimal;

//! Battery model parameters.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::emotion::EmotionCategory;
use crate::error::ValidationError;

/// Signed weight applied to each category's share of a bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionWeights {
    #[serde(default = "default_happy")]
    pub happy: f64,
    #[serde(default = "default_surprised")]
    pub surprised: f64,
    #[serde(default = "default_sad")]
    pub sad: f64,
    #[serde(default = "default_angry")]
    pub angry: f64,
    #[serde(default = "default_worried")]
    pub worried: f64,
    #[serde(default)]
    pub neutral: f64,
}

fn default_happy() -> f64 {
    500.0
}
fn default_surprised() -> f64 {
    300.0
}
fn default_sad() -> f64 {
    -300.0
}
fn default_angry() -> f64 {
    -400.0
}
fn default_worried() -> f64 {
    -300.0
}

impl Default for EmotionWeights {
    fn default() -> Self {
        Self {
            happy: default_happy(),
            surprised: default_surprised(),
            sad: default_sad(),
            angry: default_angry(),
            worried: default_worried(),
            neutral: 0.0,
        }
    }
}

impl EmotionWeights {
    pub fn weight(&self, category: EmotionCategory) -> f64 {
        match category {
            EmotionCategory::Neutral => self.neutral,
            EmotionCategory::Happy => self.happy,
            EmotionCategory::Angry => self.angry,
            EmotionCategory::Sad => self.sad,
            EmotionCategory::Surprised => self.surprised,
            EmotionCategory::Worried => self.worried,
        }
    }
}

/// Parameters of the daily battery simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryConfig {
    #[serde(default = "default_start_level")]
    pub start_level: f64,
    /// Below this level the scheduled drift pushes upward instead of down.
    #[serde(default = "default_floor_level_trigger")]
    pub floor_level_trigger: f64,
    #[serde(default = "default_end_level")]
    pub end_level: f64,
    #[serde(default = "default_window_start", with = "hhmm")]
    pub window_start: NaiveTime,
    #[serde(default = "default_window_end", with = "hhmm")]
    pub window_end: NaiveTime,
    #[serde(default = "default_bin_width_minutes")]
    pub bin_width_minutes: u32,
    #[serde(default = "default_min_level")]
    pub min_level: f64,
    #[serde(default = "default_max_level")]
    pub max_level: f64,
    #[serde(default)]
    pub weights: EmotionWeights,
}

fn default_start_level() -> f64 {
    90.0
}
fn default_floor_level_trigger() -> f64 {
    50.0
}
fn default_end_level() -> f64 {
    60.0
}
fn default_window_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}
fn default_window_end() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 59, 0).unwrap_or(NaiveTime::MIN)
}
fn default_bin_width_minutes() -> u32 {
    10
}
fn default_min_level() -> f64 {
    20.0
}
fn default_max_level() -> f64 {
    100.0
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            start_level: default_start_level(),
            floor_level_trigger: default_floor_level_trigger(),
            end_level: default_end_level(),
            window_start: default_window_start(),
            window_end: default_window_end(),
            bin_width_minutes: default_bin_width_minutes(),
            min_level: default_min_level(),
            max_level: default_max_level(),
            weights: EmotionWeights::default(),
        }
    }
}

impl BatteryConfig {
    /// Clamp a level into `[min_level, max_level]`.
    pub fn clamp(&self, level: f64) -> f64 {
        level.max(self.min_level).min(self.max_level)
    }

    /// Reject parameter combinations the simulation cannot honor.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bin_width_minutes == 0 {
            return Err(invalid("bin_width_minutes", "must be greater than zero"));
        }
        if !self.min_level.is_finite() || !self.max_level.is_finite() {
            return Err(invalid("min_level", "level bounds must be finite"));
        }
        if self.min_level > self.max_level {
            return Err(invalid(
                "min_level",
                &format!("{} exceeds max_level {}", self.min_level, self.max_level),
            ));
        }
        for (field, value) in [
            ("start_level", self.start_level),
            ("end_level", self.end_level),
        ] {
            if !(self.min_level..=self.max_level).contains(&value) {
                return Err(invalid(
                    field,
                    &format!(
                        "{value} is outside [{}, {}]",
                        self.min_level, self.max_level
                    ),
                ));
            }
        }
        if !self.floor_level_trigger.is_finite() {
            return Err(invalid("floor_level_trigger", "must be finite"));
        }
        for category in EmotionCategory::ALL {
            if !self.weights.weight(category).is_finite() {
                return Err(invalid(
                    &format!("weights.{}", category.as_str().to_lowercase()),
                    "must be finite",
                ));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Parse `HH:MM` (seconds, when present, are ignored).
pub fn parse_hhmm(input: &str) -> Result<NaiveTime, ValidationError> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime(input.to_string()))
}

/// Serde adapter storing times as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}

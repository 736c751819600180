//! Emotion observations as the battery model consumes them.
//!
//! Raw rows come out of the record store as strings; this module turns them
//! into structured [`EmotionObservation`]s, dropping rows whose timestamp
//! cannot be read.

mod label;
mod timestamp;

pub use label::{normalize, EmotionCategory, NormalizedEmotion};
pub use timestamp::{
    format_record_timestamp, parse_day, parse_record_timestamp, record_day_prefix,
};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One detection event, minute resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionObservation {
    pub timestamp: NaiveDateTime,
    pub emotion_raw: String,
    pub has_face: bool,
    #[serde(default)]
    pub username: Option<String>,
}

impl EmotionObservation {
    pub fn new(timestamp: NaiveDateTime, emotion_raw: impl Into<String>) -> Self {
        Self {
            timestamp,
            emotion_raw: emotion_raw.into(),
            has_face: true,
            username: None,
        }
    }

    pub fn normalized(&self) -> NormalizedEmotion {
        normalize(&self.emotion_raw)
    }
}

/// Row shape returned by the record store for battery queries.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub timestamp: String,
    pub emotion: String,
}

/// Convert store rows into observations, skipping malformed timestamps.
///
/// Rows handed out by the store already satisfy `has_face = 1`.
pub fn observations_from_rows(rows: Vec<RawObservation>) -> Vec<EmotionObservation> {
    rows.into_iter()
        .filter_map(|row| match parse_record_timestamp(&row.timestamp) {
            Some(timestamp) => Some(EmotionObservation::new(timestamp, row.emotion)),
            None => {
                tracing::warn!(timestamp = %row.timestamp, "dropping record with malformed timestamp");
                None
            }
        })
        .collect()
}

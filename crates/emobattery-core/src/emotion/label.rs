//! Emotion taxonomy and label normalization.
//!
//! Providers report emotions in their own vocabulary (English names,
//! localized strings, synonyms). Everything is folded onto six canonical
//! categories; labels outside the table are kept verbatim as
//! [`NormalizedEmotion::Unknown`] and carry no weight.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical emotion categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmotionCategory {
    Neutral,
    Happy,
    Angry,
    Sad,
    Surprised,
    Worried,
}

impl EmotionCategory {
    /// All categories in display order.
    pub const ALL: [EmotionCategory; 6] = [
        EmotionCategory::Neutral,
        EmotionCategory::Happy,
        EmotionCategory::Angry,
        EmotionCategory::Sad,
        EmotionCategory::Surprised,
        EmotionCategory::Worried,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionCategory::Neutral => "Neutral",
            EmotionCategory::Happy => "Happy",
            EmotionCategory::Angry => "Angry",
            EmotionCategory::Sad => "Sad",
            EmotionCategory::Surprised => "Surprised",
            EmotionCategory::Worried => "Worried",
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of normalizing a raw provider label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NormalizedEmotion {
    Known(EmotionCategory),
    Unknown(String),
}

impl NormalizedEmotion {
    pub fn category(&self) -> Option<EmotionCategory> {
        match self {
            NormalizedEmotion::Known(category) => Some(*category),
            NormalizedEmotion::Unknown(_) => None,
        }
    }
}

impl fmt::Display for NormalizedEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedEmotion::Known(category) => category.fmt(f),
            NormalizedEmotion::Unknown(raw) => f.write_str(raw),
        }
    }
}

// Localized labels emitted by the capture pipeline.
const LOCALIZED_LABELS: &[(&str, EmotionCategory)] = &[
    ("中立", EmotionCategory::Neutral),
    ("中性", EmotionCategory::Neutral),
    ("开心", EmotionCategory::Happy),
    ("快乐", EmotionCategory::Happy),
    ("高兴", EmotionCategory::Happy),
    ("愤怒", EmotionCategory::Angry),
    ("生气", EmotionCategory::Angry),
    ("悲伤", EmotionCategory::Sad),
    ("伤心", EmotionCategory::Sad),
    ("惊讶", EmotionCategory::Surprised),
    ("担忧", EmotionCategory::Worried),
    ("忧虑", EmotionCategory::Worried),
];

/// Map a raw provider label onto the canonical taxonomy.
///
/// English category names match case-insensitively. Unrecognized input is
/// returned unchanged as [`NormalizedEmotion::Unknown`].
pub fn normalize(raw: &str) -> NormalizedEmotion {
    let trimmed = raw.trim();

    if let Some(category) = EmotionCategory::ALL
        .iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
    {
        return NormalizedEmotion::Known(*category);
    }

    LOCALIZED_LABELS
        .iter()
        .find(|(label, _)| *label == trimmed)
        .map(|(_, category)| NormalizedEmotion::Known(*category))
        .unwrap_or_else(|| NormalizedEmotion::Unknown(raw.to_string()))
}

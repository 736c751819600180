//! Daily battery simulation.
//!
//! The analysis window is cut into fixed-width bins. A level starting at
//! `start_level` drifts by a constant per-bin step towards `end_level`, and
//! each bin's emotion mix nudges it up or down. Once the level sits below
//! `floor_level_trigger` the drift reverses, so the battery recovers instead
//! of draining into the floor.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::config::BatteryConfig;
use crate::emotion::{EmotionCategory, EmotionObservation, NormalizedEmotion};

/// A `[start, end)` slice of the analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBin {
    #[serde(with = "super::config::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "super::config::hhmm")]
    pub end: NaiveTime,
}

impl TimeBin {
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }
}

/// Bins covering `[window_start, window_end)`.
///
/// The last bin is cut short at `window_end` when the window is not a
/// multiple of the bin width. A zero-width (or inverted) window has no bins.
pub fn generate_bins(config: &BatteryConfig) -> Vec<TimeBin> {
    let start = minute_of_day(config.window_start);
    let end = minute_of_day(config.window_end);
    let width = config.bin_width_minutes;
    if width == 0 || start >= end {
        return Vec::new();
    }

    let mut bins = Vec::with_capacity(((end - start) / width + 1) as usize);
    let mut cursor = start;
    while cursor < end {
        let next = (cursor + width).min(end);
        bins.push(TimeBin {
            start: time_from_minute(cursor),
            end: time_from_minute(next),
        });
        cursor = next;
    }
    bins
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn time_from_minute(minute: u32) -> NaiveTime {
    NaiveTime::MIN + Duration::minutes(i64::from(minute))
}

/// Output for one bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryPoint {
    pub bin: TimeBin,
    /// Rounded, clamped level; `0` while the bin still lies in the future.
    pub level: u32,
    pub impact: f64,
    /// Contribution per category present in the bin. Empty means no impact.
    pub impact_detail: BTreeMap<EmotionCategory, f64>,
    /// Bin has not been reached yet today.
    pub pending: bool,
}

impl BatteryPoint {
    /// Human-readable impact breakdown, e.g. `Happy:+250.00, Sad:-75.00`.
    pub fn impact_summary(&self) -> String {
        if self.impact_detail.is_empty() {
            return "0.00".to_string();
        }
        self.impact_detail
            .iter()
            .map(|(category, value)| format!("{category}:{value:+.2}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Battery series for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBatterySeries {
    pub day: NaiveDate,
    pub points: Vec<BatteryPoint>,
    /// Level of the bin containing "now"; only set when `day` is today.
    pub current_level: Option<u32>,
    /// Face observations on `day` that fed the ratios.
    pub observation_total: usize,
    /// Observations whose label fell outside the taxonomy (weight 0).
    pub unknown_labels: usize,
}

impl DayBatterySeries {
    /// Points that have been simulated (excludes future bins of today).
    pub fn reached(&self) -> impl Iterator<Item = &BatteryPoint> {
        self.points.iter().filter(|p| !p.pending)
    }

    /// Mean of the reached levels, rounded to one decimal.
    pub fn average_level(&self) -> Option<f64> {
        let (sum, count) = self
            .reached()
            .fold((0u64, 0u64), |(sum, count), p| (sum + u64::from(p.level), count + 1));
        if count == 0 {
            return None;
        }
        Some(round_one_decimal(sum as f64 / count as f64))
    }

    /// Render as a horizontal bar chart, one row per bin.
    pub fn render_ascii_chart(&self, max_level: f64) -> String {
        let mut output = format!("\nEmotion Battery {}:\n", self.day.format("%Y-%m-%d"));
        output.push_str(&"─".repeat(60));
        output.push('\n');

        for point in &self.points {
            let label = point.bin.start.format("%H:%M");
            if point.pending {
                output.push_str(&format!("{label} {}   --\n", " ".repeat(30)));
                continue;
            }
            let ratio = if max_level > 0.0 {
                (f64::from(point.level) / max_level).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let bar_length = (ratio * 30.0) as usize;
            output.push_str(&format!(
                "{label} {}{} {:>3}  {}\n",
                "█".repeat(bar_length),
                " ".repeat(30 - bar_length),
                point.level,
                point.impact_summary()
            ));
        }

        output.push_str(&"─".repeat(60));
        output.push('\n');
        output
    }
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Simulate one day's battery from its observations.
///
/// Observations without a face, or dated on another day, are ignored.
/// `now` decides which bins of today are still pending; pass any moment on
/// a different day to simulate the whole window.
pub fn simulate_day(
    day: NaiveDate,
    observations: &[EmotionObservation],
    config: &BatteryConfig,
    now: NaiveDateTime,
) -> DayBatterySeries {
    let bins = generate_bins(config);
    let down_v = if bins.is_empty() {
        0.0
    } else {
        (config.start_level - config.end_level) / bins.len() as f64
    };

    let mut unknown_labels = 0;
    let samples: Vec<(NaiveTime, EmotionCategory)> = observations
        .iter()
        .filter(|o| o.has_face && o.timestamp.date() == day)
        .filter_map(|o| match o.normalized() {
            NormalizedEmotion::Known(category) => Some((o.timestamp.time(), category)),
            NormalizedEmotion::Unknown(raw) => {
                tracing::debug!(label = %raw, "unrecognized emotion label carries no weight");
                unknown_labels += 1;
                None
            }
        })
        .collect();
    let data_total = samples.len() + unknown_labels;

    let is_today = now.date() == day;
    let now_time = now.time();
    let mut cur_v = config.start_level;
    let mut current_level = None;
    let mut points = Vec::with_capacity(bins.len());

    for bin in bins {
        if is_today && bin.start > now_time {
            points.push(BatteryPoint {
                bin,
                level: 0,
                impact: 0.0,
                impact_detail: BTreeMap::new(),
                pending: true,
            });
            continue;
        }

        let mut counts: BTreeMap<EmotionCategory, usize> = BTreeMap::new();
        for (time, category) in &samples {
            if bin.contains(*time) {
                *counts.entry(*category).or_default() += 1;
            }
        }

        let mut impact = 0.0;
        let mut impact_detail = BTreeMap::new();
        for (category, count) in counts {
            let ratio = if data_total > 0 {
                count as f64 / data_total as f64
            } else {
                0.0
            };
            let contribution = ratio * config.weights.weight(category);
            impact += contribution;
            impact_detail.insert(category, contribution);
        }

        if cur_v < config.floor_level_trigger {
            cur_v += down_v + impact;
        } else {
            cur_v = cur_v - down_v + impact;
        }
        cur_v = config.clamp(cur_v);
        let level = cur_v.round() as u32;

        if is_today && bin.contains(now_time) {
            current_level = Some(level);
        }

        tracing::trace!(bin = %bin.start.format("%H:%M"), level, impact, "battery bin");
        points.push(BatteryPoint {
            bin,
            level,
            impact,
            impact_detail,
            pending: false,
        });
    }

    tracing::debug!(
        day = %day,
        bins = points.len(),
        observations = data_total,
        unknown_labels,
        "simulated battery day"
    );

    DayBatterySeries {
        day,
        points,
        current_level,
        observation_total: data_total,
        unknown_labels,
    }
}

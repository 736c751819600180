//! Integration tests for single-day battery analysis against the record store.

use chrono::{NaiveDate, NaiveTime};
use emobattery_core::battery::{parse_hhmm, DEFAULT_TODAY_LEVEL};
use emobattery_core::{
    today_level, BatteryConfig, BatteryStatus, Database, EmotionCategory, FixedClock,
    MonthlyAggregator, NewEmotionRecord,
};

fn add(db: &Database, timestamp: &str, emotion: &str, user: &str) {
    db.insert_record(&NewEmotionRecord {
        timestamp: timestamp.to_string(),
        emotion: emotion.to_string(),
        confidence: 0.75,
        has_face: true,
        username: Some(user.to_string()),
    })
    .unwrap();
}

fn clock_at(day: NaiveDate, hh: u32, mm: u32) -> FixedClock {
    FixedClock(day.and_time(NaiveTime::from_hms_opt(hh, mm, 0).unwrap()))
}

fn short_window() -> BatteryConfig {
    BatteryConfig {
        window_start: parse_hhmm("08:00").unwrap(),
        window_end: parse_hhmm("08:20").unwrap(),
        ..BatteryConfig::default()
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 21).unwrap()
}

#[test]
fn test_single_happy_scenario_from_store() {
    let db = Database::open_memory().unwrap();
    add(&db, "20250721-080300", "Happy", "ana");

    let aggregator = MonthlyAggregator::new(&db, short_window(), clock_at(day(), 23, 0));
    let series = aggregator.simulate_day_str("2025-07-21", None).unwrap();

    let levels: Vec<u32> = series.points.iter().map(|p| p.level).collect();
    assert_eq!(levels, vec![100, 85]);
    assert_eq!(series.current_level, None);
}

#[test]
fn test_localized_labels_and_malformed_rows() {
    let db = Database::open_memory().unwrap();
    add(&db, "20250721-080300_00", "开心", "ana");
    add(&db, "20250721-080300_01", "高兴", "ana");
    add(&db, "20250721-08xx00", "悲伤", "ana");

    let aggregator = MonthlyAggregator::new(&db, short_window(), clock_at(day(), 23, 0));
    let series = aggregator.simulate_day(day(), None).unwrap();

    assert_eq!(series.observation_total, 2);
    assert_eq!(
        series.points[0].impact_detail.get(&EmotionCategory::Happy),
        Some(&500.0)
    );
    assert!(series.points[0].impact_detail.get(&EmotionCategory::Sad).is_none());
}

#[test]
fn test_username_filter_limits_observations() {
    let db = Database::open_memory().unwrap();
    add(&db, "20250721-080300", "Happy", "ana");
    add(&db, "20250721-081300", "Angry", "bo");

    let aggregator = MonthlyAggregator::new(&db, short_window(), clock_at(day(), 23, 0));

    let everyone = aggregator.simulate_day(day(), None).unwrap();
    assert_eq!(everyone.observation_total, 2);

    let bo = aggregator.simulate_day(day(), Some("bo")).unwrap();
    assert_eq!(bo.observation_total, 1);
    assert!(bo.points[0].impact_detail.is_empty());
    // 90 - 15 = 75, then 75 - 15 - 400 clamps to the floor
    assert_eq!(bo.points.iter().map(|p| p.level).collect::<Vec<_>>(), vec![75, 20]);
}

#[test]
fn test_today_series_and_headline_level() {
    let db = Database::open_memory().unwrap();
    add(&db, "20250721-091000", "Surprised", "ana");

    let aggregator = MonthlyAggregator::new(&db, BatteryConfig::default(), clock_at(day(), 9, 15));
    let series = aggregator.simulate_today().unwrap();

    assert_eq!(series.points.len(), 60);
    assert_eq!(series.points.iter().filter(|p| p.pending).count(), 52);
    let current = series.current_level.unwrap();
    assert_eq!(current, 100);
    assert_eq!(today_level(&series), current);
    assert_eq!(BatteryStatus::from_level(current), BatteryStatus::Excellent);
}

#[test]
fn test_today_before_window_uses_default_level() {
    let db = Database::open_memory().unwrap();
    let aggregator = MonthlyAggregator::new(&db, BatteryConfig::default(), clock_at(day(), 6, 0));
    let series = aggregator.simulate_today().unwrap();

    assert!(series.points.iter().all(|p| p.pending));
    assert_eq!(today_level(&series), DEFAULT_TODAY_LEVEL);
}

#[test]
fn test_invalid_day_input_is_rejected_before_querying() {
    let db = Database::open_memory().unwrap();
    let aggregator = MonthlyAggregator::new(&db, BatteryConfig::default(), clock_at(day(), 6, 0));

    let err = aggregator.simulate_day_str("21.07.2025", None).unwrap_err();
    assert!(err.to_string().contains("21.07.2025"));
}

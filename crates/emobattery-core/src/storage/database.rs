//! SQLite-backed emotion record store.
//!
//! Provides persistent storage for:
//! - Emotion observations written by the capture pipeline
//! - The per-day monthly battery cache

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use super::migrations;
use super::traits::EmotionStore;
use crate::emotion::{record_day_prefix, RawObservation};
use crate::error::{DatabaseError, Result};
use crate::monthly::{Month, MonthlyCacheEntry};

/// Default database file name inside the data directory.
pub const DATABASE_FILE: &str = "emotion_data.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Observation to append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmotionRecord {
    /// `YYYYMMDD-HHMMSS`, optionally with a `_NN` frame suffix.
    pub timestamp: String,
    pub emotion: String,
    pub confidence: f64,
    pub has_face: bool,
    pub username: Option<String>,
}

/// SQLite database for emotion records and the monthly battery cache.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, applying pending migrations.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened emotion database");
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Append an observation.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn insert_record(&self, record: &NewEmotionRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO emotion_records (timestamp, emotion, confidence, has_face, username)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.timestamp,
                record.emotion,
                record.confidence,
                record.has_face,
                record.username,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Distinct non-empty usernames, sorted.
    pub fn usernames(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT username FROM emotion_records
             WHERE username IS NOT NULL AND username != ''
             ORDER BY username",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// When `month` was last written to the cache, if ever.
    pub fn month_cached_at(&self, month: Month) -> Result<Option<String>> {
        let cached_at = self
            .conn
            .query_row(
                "SELECT MAX(created_at) FROM battery_monthly_cache WHERE month = ?1",
                params![month.to_string()],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(cached_at.flatten())
    }
}

impl EmotionStore for Database {
    fn day_observations(
        &self,
        day: NaiveDate,
        username: Option<&str>,
    ) -> Result<Vec<RawObservation>> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, emotion FROM emotion_records
             WHERE substr(timestamp, 1, 8) = ?1 AND has_face = 1
               AND (?2 IS NULL OR username = ?2)
             ORDER BY timestamp",
        )?;
        let rows = stmt.query_map(params![record_day_prefix(day), username], |row| {
            Ok(RawObservation {
                timestamp: row.get(0)?,
                emotion: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn day_observation_count(&self, day: NaiveDate) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM emotion_records
             WHERE substr(timestamp, 1, 8) = ?1 AND has_face = 1",
            params![record_day_prefix(day)],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn cached_month(&self, month: Month) -> Result<Vec<MonthlyCacheEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, avg_battery, observation_count FROM battery_monthly_cache
             WHERE month = ?1
             ORDER BY day",
        )?;
        let rows = stmt.query_map(params![month.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<f64>>(1)?,
                row.get::<_, Option<i64>>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (day, avg_battery, observation_count) = row?;
            let day = NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|_| {
                DatabaseError::QueryFailed(format!("malformed cached day '{day}' for {month}"))
            })?;
            entries.push(MonthlyCacheEntry {
                month,
                day,
                avg_battery,
                observation_count: observation_count.map(|n| n.max(0) as u64),
            });
        }
        Ok(entries)
    }

    fn replace_month_cache(&self, month: Month, rows: &[MonthlyCacheEntry]) -> Result<()> {
        // Dropping the transaction without commit rolls it back.
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM battery_monthly_cache WHERE month = ?1",
            params![month.to_string()],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO battery_monthly_cache
                     (month, day, avg_battery, observation_count, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let created_at = Utc::now().to_rfc3339();
            for row in rows {
                insert.execute(params![
                    row.month.to_string(),
                    row.day.format("%Y-%m-%d").to_string(),
                    row.avg_battery,
                    row.observation_count.map(|n| n as i64),
                    created_at,
                ])?;
            }
        }
        tx.commit()?;
        tracing::info!(month = %month, rows = rows.len(), "replaced monthly battery cache");
        Ok(())
    }

    fn clear_month_cache(&self, month: Month) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM battery_monthly_cache WHERE month = ?1",
            params![month.to_string()],
        )?;
        tracing::info!(month = %month, removed, "cleared monthly battery cache");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: &str, emotion: &str, has_face: bool, user: Option<&str>) -> NewEmotionRecord {
        NewEmotionRecord {
            timestamp: timestamp.to_string(),
            emotion: emotion.to_string(),
            confidence: 0.8,
            has_face,
            username: user.map(str::to_string),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn entry(month: Month, day: NaiveDate, avg_battery: Option<f64>) -> MonthlyCacheEntry {
        MonthlyCacheEntry {
            month,
            day,
            avg_battery,
            observation_count: avg_battery.map(|_| 1),
        }
    }

    #[test]
    fn day_queries_filter_by_day_and_face() {
        let db = Database::open_memory().unwrap();
        db.insert_record(&record("20250721-090000", "Happy", true, Some("ana"))).unwrap();
        db.insert_record(&record("20250721-090500_01", "Sad", true, Some("bo"))).unwrap();
        db.insert_record(&record("20250721-091000", "Happy", false, Some("ana"))).unwrap();
        db.insert_record(&record("20250722-090000", "Happy", true, None)).unwrap();

        assert_eq!(db.day_observation_count(day(21)).unwrap(), 2);
        assert_eq!(db.day_observation_count(day(22)).unwrap(), 1);
        assert_eq!(db.day_observation_count(day(23)).unwrap(), 0);

        let rows = db.day_observations(day(21), None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, "20250721-090000");

        let ana = db.day_observations(day(21), Some("ana")).unwrap();
        assert_eq!(ana.len(), 1);
        assert_eq!(ana[0].emotion, "Happy");

    }

    #[test]
    fn usernames_are_distinct_and_sorted() {
        let db = Database::open_memory().unwrap();
        db.insert_record(&record("20250721-090000", "Happy", true, Some("zoe"))).unwrap();
        db.insert_record(&record("20250721-090100", "Happy", true, Some("ana"))).unwrap();
        db.insert_record(&record("20250721-090200", "Happy", true, Some("zoe"))).unwrap();
        db.insert_record(&record("20250721-090300", "Happy", true, None)).unwrap();

        assert_eq!(db.usernames().unwrap(), vec!["ana", "zoe"]);
    }

    #[test]
    fn month_cache_replace_and_clear() {
        let db = Database::open_memory().unwrap();
        let july: Month = "2025-07".parse().unwrap();
        let august: Month = "2025-08".parse().unwrap();

        assert!(db.cached_month(july).unwrap().is_empty());
        assert_eq!(db.month_cached_at(july).unwrap(), None);

        let rows = vec![
            entry(july, day(2), Some(71.5)),
            entry(july, day(1), None),
        ];
        db.replace_month_cache(july, &rows).unwrap();
        db.replace_month_cache(
            august,
            &[entry(august, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(), Some(80.0))],
        )
        .unwrap();

        let cached = db.cached_month(july).unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].day, day(1));
        assert_eq!(cached[0].avg_battery, None);
        assert_eq!(cached[0].observation_count, None);
        assert_eq!(cached[1].observation_count, Some(1));
        assert_eq!(cached[1].avg_battery, Some(71.5));
        assert!(db.month_cached_at(july).unwrap().is_some());

        // replacing drops rows that are no longer present
        db.replace_month_cache(july, &rows[..1]).unwrap();
        assert_eq!(db.cached_month(july).unwrap().len(), 1);

        assert_eq!(db.clear_month_cache(july).unwrap(), 1);
        assert!(db.cached_month(july).unwrap().is_empty());
        assert_eq!(db.cached_month(august).unwrap().len(), 1);
    }

    #[test]
    fn failed_replace_leaves_previous_cache() {
        let db = Database::open_memory().unwrap();
        let july: Month = "2025-07".parse().unwrap();
        let original = vec![entry(july, day(1), Some(75.0))];
        db.replace_month_cache(july, &original).unwrap();

        // duplicate primary key aborts the insert half-way
        let duplicate = vec![
            entry(july, day(2), Some(60.0)),
            entry(july, day(2), Some(61.0)),
        ];
        assert!(db.replace_month_cache(july, &duplicate).is_err());

        let cached = db.cached_month(july).unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].avg_battery, Some(75.0));
    }

    #[test]
    fn open_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.insert_record(&record("20250721-090000", "Happy", true, None)).unwrap();
        }
        let reopened = Database::open_at(&path).unwrap();
        assert_eq!(reopened.day_observation_count(day(21)).unwrap(), 1);
    }
}

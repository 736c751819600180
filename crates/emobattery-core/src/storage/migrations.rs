//! Database schema migrations for emobattery.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 3;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: observation table written by the capture pipeline.
///
/// Databases produced by the capture pipeline already carry this table
/// (possibly with extra columns); `IF NOT EXISTS` leaves them untouched.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS emotion_records (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp     TEXT NOT NULL,
            emotion       TEXT NOT NULL,
            confidence    REAL NOT NULL,
            has_face      BOOLEAN NOT NULL,
            image_path    TEXT,
            username      TEXT,
            emotion_level REAL DEFAULT 0.0
        );
        CREATE INDEX IF NOT EXISTS idx_emotion_records_timestamp ON emotion_records(timestamp);",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: per-day monthly battery cache.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS battery_monthly_cache (
            month       TEXT NOT NULL,
            day         TEXT NOT NULL,
            avg_battery REAL,
            created_at  TEXT NOT NULL,
            PRIMARY KEY (month, day)
        );",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Migration v3: remember how many observations each cached day was computed from.
///
/// Rows cached before this column existed hold NULL and are recomputed on
/// the next read if their day has observations.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch("ALTER TABLE battery_monthly_cache ADD COLUMN observation_count INTEGER;")?;
    set_schema_version(&tx, 3)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            > 0
    }

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        assert!(table_exists(&conn, "emotion_records"));
        assert!(table_exists(&conn, "battery_monthly_cache"));
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn v2_cache_rows_gain_null_observation_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        migrate_v2(&conn).unwrap();
        conn.execute(
            "INSERT INTO battery_monthly_cache (month, day, avg_battery, created_at)
             VALUES ('2025-07', '2025-07-01', 80.0, '2025-08-01T00:00:00Z')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), 3);
        let count: Option<i64> = conn
            .query_row(
                "SELECT observation_count FROM battery_monthly_cache WHERE day = '2025-07-01'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, None);
    }

    #[test]
    fn existing_capture_table_is_preserved() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE emotion_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                emotion TEXT NOT NULL,
                confidence REAL NOT NULL,
                has_face BOOLEAN NOT NULL,
                image_path TEXT,
                username TEXT,
                app_name TEXT DEFAULT 'Unknown App'
            );
            INSERT INTO emotion_records (timestamp, emotion, confidence, has_face)
            VALUES ('20250721-090000', '开心', 0.9, 1);",
        )
        .unwrap();

        migrate(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM emotion_records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert!(table_exists(&conn, "battery_monthly_cache"));
    }
}

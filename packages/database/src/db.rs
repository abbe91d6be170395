//! Database connection utilities.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

use crate::DbError;

/// Opens (or creates) the surveillance `SQLite` database at `path` and
/// ensures the schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the parent directory cannot be created, the
/// database cannot be opened, or schema creation fails.
pub async fn open(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Connection(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;

    log::info!("Opened database at {}", path.display());

    Ok(db)
}

/// Creates all tables and indexes if they don't already exist.
///
/// # Errors
///
/// Returns [`DbError`] if any statement fails.
pub async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS barangays (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            district    TEXT,
            latitude    REAL,
            longitude   REAL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS patients (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name      TEXT NOT NULL,
            last_name       TEXT NOT NULL,
            age             INTEGER,
            sex             TEXT,
            barangay_id     INTEGER NOT NULL REFERENCES barangays(id),
            contact_number  TEXT
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS dengue_cases (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id      INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
            date_reported   TEXT NOT NULL,
            status          TEXT NOT NULL,
            severity        TEXT NOT NULL,
            hospitalized    INTEGER NOT NULL DEFAULT 0
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_dengue_cases_date
         ON dengue_cases (date_reported)",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS historical_records (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            barangay        TEXT NOT NULL,
            year            INTEGER NOT NULL,
            population      INTEGER NOT NULL,
            temperature     REAL NOT NULL,
            humidity        REAL NOT NULL,
            dengue_cases    INTEGER NOT NULL,
            cases_per_1000  REAL NOT NULL,
            UNIQUE(barangay, year)
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS predictions (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            prediction_date   TEXT NOT NULL,
            predicted_cases   REAL NOT NULL,
            confidence_level  REAL NOT NULL,
            risk_level        TEXT NOT NULL,
            weather_factor    TEXT NOT NULL,
            created_at        TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS barangay_officials (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            position        TEXT NOT NULL,
            barangay_id     INTEGER REFERENCES barangays(id),
            contact_number  TEXT,
            email           TEXT
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS chat_exchanges (
            id          TEXT PRIMARY KEY,
            message     TEXT NOT NULL,
            response    TEXT NOT NULL,
            created_at  TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw("PRAGMA foreign_keys = ON").await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use switchy_database::Database;

    /// A throwaway database file under the system temp dir.
    pub struct TempDb {
        pub db: Box<dyn Database>,
        path: PathBuf,
    }

    impl Drop for TempDb {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    pub async fn temp_db() -> TempDb {
        let path = std::env::temp_dir().join(format!(
            "dengue_watch_test_{}.db",
            uuid::Uuid::new_v4().simple()
        ));
        let db = super::open(&path).await.unwrap();
        TempDb { db, path }
    }
}

//! SQLite persistence gateway.
//!
//! One [`SqliteStore`] owns a single connection behind a mutex and implements every
//! repository trait of the domain modules. Multi-statement mutations run inside one
//! transaction so partial writes never become visible.

mod accounts;
#[cfg(test)]
pub(crate) mod fixtures;
mod hiring;
mod jobs;
mod notifications;
pub mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{ffi, Connection, ErrorCode};
use tracing::info;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(value: rusqlite::Error) -> Self {
        match &value {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                // Foreign key violations surface as missing parents, uniqueness as conflicts.
                let extended_code = failure.extended_code;
                match extended_code {
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => RepositoryError::NotFound,
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        RepositoryError::Conflict
                    }
                    _ => RepositoryError::Sqlite(value),
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound,
            _ => RepositoryError::Sqlite(value),
        }
    }
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens the database at `url`, creating the schema on first use.
    /// `:memory:` yields a private in-memory database.
    pub fn open(url: &str) -> Result<Self, RepositoryError> {
        if url == ":memory:" {
            return Self::open_in_memory();
        }

        let path = Path::new(url);
        let is_new_db = !path.exists();
        let conn = Connection::open(path)?;
        if is_new_db {
            info!(path = %url, "creating new database");
        }
        Self::prepare(conn)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self, RepositoryError> {
        conn.pragma_update(None, "foreign_keys", true)?;

        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let current = schema::current();
        if version == 0 {
            current.create(&conn)?;
        } else if version != current.version {
            return Err(RepositoryError::Unavailable(format!(
                "database schema version {version} is not supported (expected {})",
                current.version
            )));
        } else {
            current.validate(&conn).map_err(|err| {
                RepositoryError::Unavailable(format!("schema validation failed: {err}"))
            })?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection lock poisoned".to_string()))
    }

    /// Liveness check used by the readiness route.
    pub fn ping(&self) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_gets_current_schema() {
        let store = SqliteStore::open_in_memory().expect("store opens");
        let conn = store.connection().expect("connection");
        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .expect("version");
        assert_eq!(version, schema::current().version);
        for table in schema::current().tables {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table.name],
                    |row| row.get(0),
                )
                .expect("lookup");
            assert_eq!(count, 1, "missing table {}", table.name);
        }
    }

    #[test]
    fn reopening_a_file_database_keeps_schema() {
        let path = std::env::temp_dir().join(format!(
            "job-portal-store-{}-{}.db",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let url = path.to_string_lossy().to_string();

        SqliteStore::open(&url).expect("first open");
        let store = SqliteStore::open(&url).expect("second open validates");
        store.ping().expect("ping");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let store = SqliteStore::open_in_memory().expect("store opens");
        let conn = store.connection().expect("connection");
        conn.execute(
            "INSERT INTO job_seekers (first_name, last_name, email, password) VALUES ('a', 'b', 'x@y.z', 'h')",
            [],
        )
        .expect("first insert");
        let err = conn
            .execute(
                "INSERT INTO job_seekers (first_name, last_name, email, password) VALUES ('c', 'd', 'x@y.z', 'h')",
                [],
            )
            .map_err(RepositoryError::from)
            .expect_err("duplicate email");
        assert!(matches!(err, RepositoryError::Conflict));
    }

    #[test]
    fn not_null_violation_is_not_a_conflict() {
        let store = SqliteStore::open_in_memory().expect("store opens");
        let conn = store.connection().expect("connection");
        let err = conn
            .execute(
                "INSERT INTO job_seekers (first_name, last_name, email, password) VALUES ('a', 'b', NULL, 'h')",
                [],
            )
            .map_err(RepositoryError::from)
            .expect_err("missing email");
        assert!(matches!(err, RepositoryError::Sqlite(_)));
    }

    #[test]
    fn foreign_key_violation_maps_to_not_found() {
        let store = SqliteStore::open_in_memory().expect("store opens");
        let conn = store.connection().expect("connection");
        let err = conn
            .execute(
                "INSERT INTO interviews (application_id, scheduled_date, interview_mode, interviewer_name) VALUES (99, '2025-01-01', 'Online', 'Kim')",
                [],
            )
            .map_err(RepositoryError::from)
            .expect_err("missing parent");
        assert!(matches!(err, RepositoryError::NotFound));
    }
}

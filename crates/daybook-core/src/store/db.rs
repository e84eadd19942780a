//! SQLite database handle.
//!
//! One database file backs both stores. Opening is create-or-open: the
//! schema uses `CREATE TABLE IF NOT EXISTS`, so pointing at a fresh path
//! initializes it and pointing at an existing file leaves data intact.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::auth::PasswordPolicy;
use crate::error::{DaybookError, Result};
use crate::store::credentials::CredentialStore;
use crate::store::entries::EntryStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    salt TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS journal_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    FOREIGN KEY(user_id) REFERENCES users(id)
);
"#;

/// Handle to one journal database.
///
/// Hands out [`CredentialStore`] and [`EntryStore`] views that share the
/// underlying connection.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `DaybookError::Storage` when the file cannot be opened or
    /// the schema cannot be applied.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(Self::sqlite_error)?;
        Self::initialize(conn)
    }

    /// Open a fresh in-memory database (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Self::sqlite_error)?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(Self::sqlite_error)?;
        conn.execute_batch(SCHEMA).map_err(Self::sqlite_error)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Credential store view with the default password policy.
    pub fn credentials(&self) -> CredentialStore {
        CredentialStore::new(self.conn.clone(), PasswordPolicy::default())
    }

    /// Credential store view with a custom password policy.
    pub fn credentials_with_policy(&self, policy: PasswordPolicy) -> CredentialStore {
        CredentialStore::new(self.conn.clone(), policy)
    }

    /// Entry store view.
    pub fn entries(&self) -> EntryStore {
        EntryStore::new(self.conn.clone())
    }

    fn sqlite_error(err: rusqlite::Error) -> DaybookError {
        DaybookError::Storage(format!("SQLite error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_applies_schema() {
        let db = Database::open_in_memory().unwrap();

        let conn = db.conn.lock().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'journal_entries')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();

        let conn = db.conn.lock().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}

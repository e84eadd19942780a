//! Journal entry storage.
//!
//! Every operation is scoped by owner: an entry id belonging to another
//! user behaves exactly like an id that does not exist.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::error::{DaybookError, Result};
use crate::store::parse_timestamp;
use crate::store::types::{Entry, EntryStats, ExportDocument, ExportedEntry};

/// Entry storage view over the shared connection.
pub struct EntryStore {
    conn: Arc<Mutex<Connection>>,
}

impl EntryStore {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Create an entry and return its id.
    ///
    /// # Errors
    ///
    /// Returns `DaybookError::InvalidInput` when the title or content is
    /// empty after trimming.
    pub fn create_entry(&self, user_id: i64, title: &str, content: &str) -> Result<i64> {
        Self::validate_entry(title, content)?;

        let now = Utc::now().to_rfc3339();

        let conn = self
            .conn
            .lock()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

        conn.execute(
            "INSERT INTO journal_entries (user_id, title, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            (user_id, title, content, &now, &now),
        )
        .map_err(Self::sqlite_error)?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's entries, most recently updated first.
    ///
    /// When `search` is a non-blank term, only entries whose title or
    /// content contains it are returned. Matching is case-insensitive
    /// for ASCII, and `%`, `_` and `\` in the term are treated
    /// literally.
    pub fn list_entries(&self, user_id: i64, search: Option<&str>) -> Result<Vec<Entry>> {
        let term = search.map(str::trim).filter(|t| !t.is_empty());

        let mut sql = String::from(
            "SELECT id, user_id, title, content, created_at, updated_at \
             FROM journal_entries WHERE user_id = ?",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(term) = term {
            sql.push_str(" AND (title LIKE ? ESCAPE '\\' OR content LIKE ? ESCAPE '\\')");
            let pattern = format!("%{}%", Self::escape_like(term));
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern));
        }

        // Ties on updated_at fall back to newest id first.
        sql.push_str(" ORDER BY updated_at DESC, id DESC");

        let conn = self
            .conn
            .lock()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

        let mut stmt = conn.prepare(&sql).map_err(Self::sqlite_error)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(Self::sqlite_error)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(Self::entry_from_row(row.map_err(Self::sqlite_error)?)?);
        }

        Ok(entries)
    }

    /// Fetch one of the user's entries, or `None` when no entry with
    /// that id belongs to them.
    pub fn get_entry(&self, user_id: i64, entry_id: i64) -> Result<Option<Entry>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

        let row = conn
            .query_row(
                "SELECT id, user_id, title, content, created_at, updated_at \
                 FROM journal_entries WHERE id = ? AND user_id = ?",
                (entry_id, user_id),
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()
            .map_err(Self::sqlite_error)?;

        match row {
            Some(parts) => Ok(Some(Self::entry_from_row(parts)?)),
            None => Ok(None),
        }
    }

    /// Replace an entry's title and content and refresh its update time.
    ///
    /// # Errors
    ///
    /// Returns `DaybookError::NotFound` when no entry with that id
    /// belongs to the user, and `DaybookError::InvalidInput` when the
    /// new title or content is empty after trimming.
    pub fn update_entry(
        &self,
        user_id: i64,
        entry_id: i64,
        title: &str,
        content: &str,
    ) -> Result<()> {
        Self::validate_entry(title, content)?;

        let conn = self
            .conn
            .lock()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

        let changed = conn
            .execute(
                "UPDATE journal_entries SET title = ?, content = ?, updated_at = ? \
                 WHERE id = ? AND user_id = ?",
                (title, content, Utc::now().to_rfc3339(), entry_id, user_id),
            )
            .map_err(Self::sqlite_error)?;

        if changed == 0 {
            return Err(DaybookError::NotFound(format!("Entry {}", entry_id)));
        }

        Ok(())
    }

    /// Delete an entry. Deleting an id that does not exist (or belongs
    /// to another user) is not an error.
    pub fn delete_entry(&self, user_id: i64, entry_id: i64) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

        conn.execute(
            "DELETE FROM journal_entries WHERE id = ? AND user_id = ?",
            (entry_id, user_id),
        )
        .map_err(Self::sqlite_error)?;

        Ok(())
    }

    /// Build an export document holding all of the user's entries.
    ///
    /// # Errors
    ///
    /// Returns `DaybookError::NotFound` when the user id is unknown.
    pub fn export_entries(&self, user_id: i64) -> Result<ExportDocument> {
        let username = {
            let conn = self
                .conn
                .lock()
                .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

            let row = conn
                .query_row(
                    "SELECT username FROM users WHERE id = ?",
                    (user_id,),
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .map_err(Self::sqlite_error)?;

            match row {
                Some(name) => name,
                None => return Err(DaybookError::NotFound(format!("User {}", user_id))),
            }
        };

        let entries = self.list_entries(user_id, None)?;

        Ok(ExportDocument {
            user: username,
            exported_at: Utc::now(),
            total_entries: entries.len(),
            entries: entries.into_iter().map(ExportedEntry::from).collect(),
        })
    }

    /// Summarize a user's journal activity.
    ///
    /// "Today" and "this week" count by creation date, so an entry
    /// created six days ago and edited since still counts toward the
    /// week.
    pub fn stats(&self, user_id: i64) -> Result<EntryStats> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

        let total_entries: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM journal_entries WHERE user_id = ?",
                (user_id,),
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let entries_today: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM journal_entries WHERE user_id = ? AND substr(created_at, 1, 10) = ?",
                (user_id, &today),
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;

        let week_start = (Utc::now() - chrono::Duration::days(7))
            .format("%Y-%m-%d")
            .to_string();
        let entries_this_week: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM journal_entries WHERE user_id = ? AND substr(created_at, 1, 10) >= ?",
                (user_id, &week_start),
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;

        let last_updated: Option<String> = conn
            .query_row(
                "SELECT MAX(updated_at) FROM journal_entries WHERE user_id = ?",
                (user_id,),
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;

        let last_updated = match last_updated {
            Some(raw) => Some(parse_timestamp(&raw)?),
            None => None,
        };

        Ok(EntryStats {
            total_entries,
            entries_today,
            entries_this_week,
            last_updated,
        })
    }

    fn validate_entry(title: &str, content: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(DaybookError::InvalidInput("Title cannot be empty".to_string()));
        }
        if content.trim().is_empty() {
            return Err(DaybookError::InvalidInput(
                "Content cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn escape_like(term: &str) -> String {
        term.replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    }

    fn entry_from_row(parts: (i64, i64, String, String, String, String)) -> Result<Entry> {
        let (id, user_id, title, content, created_at, updated_at) = parts;

        Ok(Entry {
            id,
            user_id,
            title,
            content,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn sqlite_error(err: rusqlite::Error) -> DaybookError {
        DaybookError::Storage(format!("SQLite error: {}", err))
    }
}

//! Core data types for the store layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, sanitized for callers.
///
/// Salt and password hash never leave the credential store; this type is
/// safe to display or serialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique numeric identifier
    pub id: i64,

    /// Unique username (matched case-sensitively)
    pub username: String,

    /// When this user registered
    pub created_at: DateTime<Utc>,
}

/// A journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Unique numeric identifier
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Entry title (non-empty)
    pub title: String,

    /// Entry body (non-empty)
    pub content: String,

    /// When this entry was created (immutable)
    pub created_at: DateTime<Utc>,

    /// Reset on every content-affecting mutation
    pub updated_at: DateTime<Utc>,
}

/// One entry inside an export document.
///
/// Same shape as [`Entry`] minus the owning user id, which is redundant
/// in a single-user export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedEntry {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Entry> for ExportedEntry {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Serializable snapshot of one user's full journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Username of the exporting user
    pub user: String,

    /// When the export was produced
    pub exported_at: DateTime<Utc>,

    /// Number of entries in `entries`
    pub total_entries: usize,

    /// All entries, most recently updated first
    pub entries: Vec<ExportedEntry>,
}

/// Dashboard summary counts for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryStats {
    /// Total entries owned by the user
    pub total_entries: i64,

    /// Entries created today (UTC calendar day)
    pub entries_today: i64,

    /// Entries created in the last 7 days
    pub entries_this_week: i64,

    /// Most recent updated timestamp, `None` when there are no entries
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> Entry {
        Entry {
            id: 3,
            user_id: 1,
            title: "Day One".to_string(),
            content: "It rained.".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_exported_entry_drops_user_id() {
        let exported = ExportedEntry::from(sample_entry());
        let value = serde_json::to_value(&exported).unwrap();

        assert!(value.get("user_id").is_none());
        assert_eq!(value.get("id").and_then(|v| v.as_i64()), Some(3));
        assert_eq!(
            value.get("title").and_then(|v| v.as_str()),
            Some("Day One")
        );
    }

    #[test]
    fn test_export_document_shape() {
        let document = ExportDocument {
            user: "alice".to_string(),
            exported_at: Utc::now(),
            total_entries: 1,
            entries: vec![ExportedEntry::from(sample_entry())],
        };

        let value = serde_json::to_value(&document).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["entries", "exported_at", "total_entries", "user"]);
        assert!(value
            .get("exported_at")
            .and_then(|v| v.as_str())
            .is_some());
    }
}

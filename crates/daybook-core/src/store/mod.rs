//! SQLite persistence layer.
//!
//! [`Database`] owns the connection and hands out per-concern views:
//! [`CredentialStore`] for accounts, [`EntryStore`] for journal entries.
//! Timestamps are stored as RFC 3339 text in UTC, which keeps plain
//! `ORDER BY` comparisons chronological.

pub mod credentials;
pub mod db;
pub mod entries;
pub mod types;

pub use credentials::CredentialStore;
pub use db::Database;
pub use entries::EntryStore;
pub use types::{Entry, EntryStats, ExportDocument, ExportedEntry, User};

use chrono::{DateTime, Utc};

use crate::error::{DaybookError, Result};

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| DaybookError::Storage(format!("Invalid stored timestamp: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_round_trips() {
        let now = Utc::now();
        let parsed = parse_timestamp(&now.to_rfc3339()).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let result = parse_timestamp("yesterday-ish");
        assert!(matches!(result, Err(DaybookError::Storage(_))));
    }
}

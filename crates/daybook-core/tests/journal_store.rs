use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use daybook_core::{Database, DaybookError};

struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be available")
            .as_nanos();
        let filename = format!("{}_{}_{}.daybook", prefix, std::process::id(), nanos);
        let path = std::env::temp_dir().join(filename);
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[test]
fn test_open_creates_database_file() {
    let temp = TempFile::new("daybook_store_create");

    let db = Database::open(&temp.path).expect("open should succeed");
    db.credentials()
        .register_user("alice", "secret1")
        .expect("register should succeed");

    assert!(temp.path.exists());
    let on_disk = fs::read(&temp.path).expect("read should succeed");
    assert!(!on_disk.is_empty());
}

#[test]
fn test_data_survives_reopen() {
    let temp = TempFile::new("daybook_store_reopen");

    let user_id = {
        let db = Database::open(&temp.path).expect("open should succeed");
        let user_id = db
            .credentials()
            .register_user("alice", "secret1")
            .expect("register should succeed");
        db.entries()
            .create_entry(user_id, "Before reopen", "still here")
            .expect("create should succeed");
        user_id
    };

    let db = Database::open(&temp.path).expect("reopen should succeed");

    let authed = db
        .credentials()
        .authenticate("alice", "secret1")
        .expect("authenticate should succeed");
    assert_eq!(authed, user_id);

    let entries = db
        .entries()
        .list_entries(user_id, None)
        .expect("list should succeed");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Before reopen");
}

#[test]
fn test_journal_flow() {
    let temp = TempFile::new("daybook_store_flow");
    let db = Database::open(&temp.path).expect("open should succeed");

    let credentials = db.credentials();
    let entries = db.entries();

    let alice = credentials
        .register_user("alice", "secret1")
        .expect("register should succeed");

    entries
        .create_entry(alice, "Rainy day", "Stayed in and read all afternoon")
        .expect("create should succeed");
    entries
        .create_entry(alice, "Errands", "Got caught in the rain on the way back")
        .expect("create should succeed");

    let hits = entries
        .list_entries(alice, Some("rain"))
        .expect("search should succeed");
    assert_eq!(hits.len(), 2);

    let misses = entries
        .list_entries(alice, Some("snow"))
        .expect("search should succeed");
    assert!(misses.is_empty());

    let wrong = credentials.authenticate("alice", "secret2").unwrap_err();
    assert!(matches!(wrong, DaybookError::InvalidCredentials));

    let unknown = credentials.authenticate("mallory", "secret1").unwrap_err();
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[test]
fn test_users_cannot_see_each_others_entries() {
    let temp = TempFile::new("daybook_store_isolation");
    let db = Database::open(&temp.path).expect("open should succeed");

    let credentials = db.credentials();
    let entries = db.entries();

    let alice = credentials
        .register_user("alice", "secret1")
        .expect("register should succeed");
    let bob = credentials
        .register_user("bob", "secret2")
        .expect("register should succeed");

    let alice_entry = entries
        .create_entry(alice, "Private thoughts", "for my eyes only")
        .expect("create should succeed");
    entries
        .create_entry(bob, "Grocery list", "eggs and flour")
        .expect("create should succeed");

    let bobs_view = entries.list_entries(bob, None).expect("list should succeed");
    assert_eq!(bobs_view.len(), 1);
    assert_eq!(bobs_view[0].title, "Grocery list");

    assert!(entries
        .get_entry(bob, alice_entry)
        .expect("get should succeed")
        .is_none());
}

#[test]
fn test_export_serializes_to_expected_json() {
    let temp = TempFile::new("daybook_store_export");
    let db = Database::open(&temp.path).expect("open should succeed");

    let alice = db
        .credentials()
        .register_user("alice", "secret1")
        .expect("register should succeed");
    db.entries()
        .create_entry(alice, "First", "hello")
        .expect("create should succeed");

    let doc = db
        .entries()
        .export_entries(alice)
        .expect("export should succeed");
    let value = serde_json::to_value(&doc).expect("serialize should succeed");

    assert_eq!(value["user"], "alice");
    assert_eq!(value["total_entries"], 1);

    let exported = value["entries"].as_array().expect("entries should be an array");
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0]["title"], "First");
    assert_eq!(exported[0]["content"], "hello");
    assert!(exported[0].get("user_id").is_none());
    assert!(exported[0]["created_at"].is_string());
}

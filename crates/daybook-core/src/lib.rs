//! # Daybook Core
//!
//! Core library for Daybook - a multi-user, password-protected personal
//! journal backed by SQLite.
//!
//! This crate provides account handling, entry storage, and export logic
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **auth**: Password hashing, verification, and policy
//! - **store**: SQLite-backed credential and entry storage
//! - **error**: Shared error type
//!
//! ## Security model
//!
//! Plaintext passwords exist only transiently in memory. The database
//! holds a per-user random salt and a PBKDF2-SHA256 hash; verification
//! compares hashes in constant time, and every authentication failure
//! looks the same to the caller.

pub mod auth;
pub mod error;
pub mod store;

pub use error::{DaybookError, Result};
pub use store::{
    CredentialStore, Database, Entry, EntryStats, EntryStore, ExportDocument, ExportedEntry, User,
};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

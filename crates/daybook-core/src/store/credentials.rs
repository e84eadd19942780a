//! User registration and password verification.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};

use crate::auth::{generate_salt, hash_password, validate_username, PasswordHash, PasswordPolicy};
use crate::error::{DaybookError, Result};
use crate::store::parse_timestamp;
use crate::store::types::User;

/// Credential storage and verification.
///
/// Plaintext passwords never touch the database: only a per-user random
/// salt and the hash derived from it are stored, both hex-encoded.
pub struct CredentialStore {
    conn: Arc<Mutex<Connection>>,
    policy: PasswordPolicy,
}

impl CredentialStore {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>, policy: PasswordPolicy) -> Self {
        Self { conn, policy }
    }

    /// Register a new user and return their id.
    ///
    /// Uniqueness is enforced by the database constraint rather than a
    /// lookup, so two concurrent registrations of the same name cannot
    /// both succeed.
    ///
    /// # Errors
    ///
    /// Returns `DaybookError::InvalidInput` when the username or password
    /// fails validation, and `DaybookError::UsernameTaken` when the
    /// username already exists.
    pub fn register_user(&self, username: &str, password: &str) -> Result<i64> {
        validate_username(username)?;
        self.policy.validate(password)?;

        let salt = generate_salt();
        let hash = hash_password(password, &salt)?;
        let created_at = chrono::Utc::now().to_rfc3339();

        let conn = self
            .conn
            .lock()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

        let result = conn.execute(
            "INSERT INTO users (username, salt, password_hash, created_at) VALUES (?, ?, ?, ?)",
            (username, hex::encode(salt), hash.to_hex(), created_at),
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(DaybookError::UsernameTaken)
            }
            Err(err) => Err(Self::sqlite_error(err)),
        }
    }

    /// Verify a username/password pair and return the user's id.
    ///
    /// Every failure path reports `DaybookError::InvalidCredentials`, so
    /// a caller cannot tell an unknown username from a wrong password.
    /// Hashes are compared in constant time.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<i64> {
        // Empty credentials can never match; fail the same way as a
        // wrong password.
        if username.trim().is_empty() || password.is_empty() {
            return Err(DaybookError::InvalidCredentials);
        }

        let (user_id, salt_hex, stored_hex) = {
            let conn = self
                .conn
                .lock()
                .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

            let row = conn.query_row(
                "SELECT id, salt, password_hash FROM users WHERE username = ?",
                (username,),
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            );

            match row {
                Ok(found) => found,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(DaybookError::InvalidCredentials)
                }
                Err(err) => return Err(Self::sqlite_error(err)),
            }
        };

        let salt = hex::decode(&salt_hex)
            .map_err(|err| DaybookError::Storage(format!("Invalid stored salt: {}", err)))?;
        let stored = PasswordHash::from_hex(&stored_hex)?;
        let candidate = hash_password(password, &salt)?;

        if candidate.ct_eq(&stored) {
            Ok(user_id)
        } else {
            Err(DaybookError::InvalidCredentials)
        }
    }

    /// Look up a user by id. Credential material is not included.
    pub fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DaybookError::Storage("SQLite connection poisoned".to_string()))?;

        let row = conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE id = ?",
                (user_id,),
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(Self::sqlite_error)?;

        match row {
            Some((id, username, created_at)) => Ok(Some(User {
                id,
                username,
                created_at: parse_timestamp(&created_at)?,
            })),
            None => Ok(None),
        }
    }

    fn sqlite_error(err: rusqlite::Error) -> DaybookError {
        DaybookError::Storage(format!("SQLite error: {}", err))
    }
}

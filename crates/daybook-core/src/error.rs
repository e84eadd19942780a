//! Error types for Daybook core operations.
//!
//! This module defines the error taxonomy shared by the credential and
//! entry stores. Messages are written to be shown to users as-is.

use thiserror::Error;

/// Result type alias for Daybook operations.
pub type Result<T> = std::result::Result<T, DaybookError>;

/// Core error type for Daybook operations.
#[derive(Debug, Error)]
pub enum DaybookError {
    /// Invalid user input (empty field, policy violation)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Registration against an already-registered username
    #[error("Username is already taken")]
    UsernameTaken,

    /// Unified authentication failure: unknown username and wrong
    /// password are deliberately indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for DaybookError {
    fn from(err: std::io::Error) -> Self {
        DaybookError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message_names_no_cause() {
        // The rendered message must not reveal which check failed.
        assert_eq!(
            DaybookError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DaybookError = io.into();
        assert!(matches!(err, DaybookError::Storage(_)));
    }
}

//! Credential input validation.
//!
//! Enforces the password policy floor and basic username requirements.

use crate::error::{DaybookError, Result};

/// Default minimum password length in bytes.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Password acceptance policy.
///
/// The minimum length is a policy floor, not a hard-coded check: stores
/// are constructed with a policy so the floor can be raised without
/// touching registration call sites.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    /// Minimum password length in bytes
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    /// Validate a candidate password against this policy.
    ///
    /// # Errors
    ///
    /// Returns `DaybookError::InvalidInput` when the password is empty,
    /// only whitespace, or shorter than the policy minimum.
    pub fn validate(&self, password: &str) -> Result<()> {
        if password.trim().is_empty() {
            return Err(DaybookError::InvalidInput(
                "Password cannot be empty".to_string(),
            ));
        }

        if password.len() < self.min_length {
            return Err(DaybookError::InvalidInput(format!(
                "Password must be at least {} characters (got {})",
                self.min_length,
                password.len()
            )));
        }

        Ok(())
    }
}

/// Validate a username for registration.
///
/// Usernames are matched case-sensitively and exactly; the only
/// requirement is that one is present.
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(DaybookError::InvalidInput(
            "Username cannot be empty".to_string(),
        ));
    }

    Ok(())
}

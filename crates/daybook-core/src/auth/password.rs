//! Password hashing using PBKDF2-HMAC-SHA256.
//!
//! This module derives password hashes from user passwords using PBKDF2
//! with a per-user random salt, making offline brute-force attacks
//! expensive and precomputed lookup tables useless.

use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::ZeroizeOnDrop;

use crate::error::{DaybookError, Result};

/// PBKDF2 iteration count. Every stored hash was derived with this count,
/// so changing it invalidates existing credentials.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of the per-user random salt in bytes.
pub const SALT_LENGTH: usize = 32;

/// Length of the derived hash in bytes (256 bits).
pub const HASH_LENGTH: usize = 32;

/// A password hash derived via PBKDF2.
///
/// This type ensures the derived bytes are zeroized from memory when
/// dropped and compares in constant time, so a timing side channel cannot
/// reveal how many leading bytes of a guess were correct.
#[derive(Clone, ZeroizeOnDrop)]
pub struct PasswordHash {
    /// The raw hash bytes (zeroized on drop)
    bytes: [u8; HASH_LENGTH],
}

impl PasswordHash {
    pub(crate) fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse a hash from its hex encoding at rest.
    ///
    /// # Errors
    ///
    /// Returns `DaybookError::Storage` when the stored text is not valid
    /// hex of the expected length.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let decoded = hex::decode(encoded)
            .map_err(|e| DaybookError::Storage(format!("Invalid stored hash: {}", e)))?;
        let bytes: [u8; HASH_LENGTH] = decoded
            .try_into()
            .map_err(|_| DaybookError::Storage("Invalid stored hash length".to_string()))?;
        Ok(Self { bytes })
    }

    /// Hex encoding for at-rest storage.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Constant-time equality against another hash.
    pub fn ct_eq(&self, other: &PasswordHash) -> bool {
        bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHash")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt from the operating system RNG.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a password hash with PBKDF2-HMAC-SHA256.
///
/// # Arguments
///
/// * `password` - The plaintext password (never stored or logged)
/// * `salt` - Random salt (must be unique per user)
///
/// # Security
///
/// - Same password + salt always produces the same hash (deterministic)
/// - Different salt produces a different hash (salt is stored per user)
/// - 100,000 iterations make each guess deliberately slow
pub fn hash_password(password: &str, salt: &[u8]) -> Result<PasswordHash> {
    if password.is_empty() {
        return Err(DaybookError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    if salt.len() < SALT_LENGTH {
        return Err(DaybookError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    let mut bytes = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut bytes);

    Ok(PasswordHash::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashing_deterministic() {
        let salt = [7u8; SALT_LENGTH];

        let first = hash_password("correct horse", &salt).unwrap();
        let second = hash_password("correct horse", &salt).unwrap();

        assert!(first.ct_eq(&second));
        assert_eq!(first.to_hex(), second.to_hex());
    }

    #[test]
    fn test_different_salt_different_hash() {
        let hash1 = hash_password("correct horse", &[1u8; SALT_LENGTH]).unwrap();
        let hash2 = hash_password("correct horse", &[2u8; SALT_LENGTH]).unwrap();

        assert!(!hash1.ct_eq(&hash2));
    }

    #[test]
    fn test_different_password_different_hash() {
        let salt = [7u8; SALT_LENGTH];

        let hash1 = hash_password("password-one", &salt).unwrap();
        let hash2 = hash_password("password-two", &salt).unwrap();

        assert!(!hash1.ct_eq(&hash2));
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = hash_password("", &[7u8; SALT_LENGTH]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Password cannot be empty"));
    }

    #[test]
    fn test_short_salt_rejected() {
        let result = hash_password("correct horse", b"short");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 32 bytes"));
    }

    #[test]
    fn test_generate_salt_is_random() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();

        assert_eq!(salt1.len(), SALT_LENGTH);
        assert_ne!(salt1, salt2);
    }

    #[test]
    fn test_hex_round_trip() {
        let salt = generate_salt();
        let hash = hash_password("correct horse", &salt).unwrap();

        let restored = PasswordHash::from_hex(&hash.to_hex()).unwrap();
        assert!(hash.ct_eq(&restored));
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(PasswordHash::from_hex("not hex").is_err());
        assert!(PasswordHash::from_hex("abcd").is_err());
    }

    #[test]
    fn test_debug_redacts_hash_bytes() {
        let hash = hash_password("correct horse", &[7u8; SALT_LENGTH]).unwrap();

        let debug_output = format!("{:?}", hash);
        assert!(debug_output.contains("REDACTED"));

        let hash_hex = hash.to_hex();
        assert!(!debug_output.contains(&hash_hex[..8]));
    }

    #[test]
    fn test_hash_length() {
        let hash = hash_password("password", &[0u8; SALT_LENGTH]).unwrap();
        assert_eq!(hash.to_hex().len(), HASH_LENGTH * 2);
    }
}

//! Credential handling for Daybook.
//!
//! This module covers everything that touches a plaintext password:
//! - **password**: PBKDF2-HMAC-SHA256 hashing with per-user random salts
//! - **policy**: username and password acceptance rules
//!
//! ## Security Model
//!
//! - Plaintext passwords are consumed, hashed, and never stored or logged
//! - Per-user 32-byte salts defeat precomputed lookup tables
//! - Hash comparison is constant time, so verification cannot leak how
//!   close a guess was
//! - Unknown-username and wrong-password failures are indistinguishable
//!   to callers

pub mod password;
pub mod policy;

pub use password::{
    generate_salt, hash_password, PasswordHash, HASH_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH,
};
pub use policy::{validate_username, PasswordPolicy, MIN_PASSWORD_LENGTH};

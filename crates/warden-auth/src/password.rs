//! Password hashing and verification.
//!
//! Passwords are stored as Argon2id hashes in PHC string format, each with
//! its own random salt drawn from `OsRng`.
//!
//! # Example
//!
//! ```
//! use warden_auth::password::{hash_password, verify_password};
//!
//! let hash = hash_password("hunter2").unwrap();
//! assert!(hash.starts_with("$argon2id$"));
//! assert!(verify_password("hunter2", &hash).unwrap());
//! assert!(!verify_password("hunter3", &hash).unwrap());
//! ```

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a password for storage using Argon2id with default parameters.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if hashing fails (rare).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
///
/// `Ok(true)` on a match, `Ok(false)` on a mismatch.
///
/// # Errors
///
/// Returns `Err` only if `hash` is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);
    Ok(result.is_ok())
}

//! Password hashing and verification using Argon2id
//!
//! Produces and checks PHC-format hashes. Parameters follow OWASP
//! recommendations: Argon2id, 64 MB memory, 3 iterations, 4 lanes,
//! 16-byte random salt, 32-byte output.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use thiserror::Error;

/// A syntactically valid hash that matches no password
///
/// Verified against when a username does not resolve, so the failure path
/// costs the same as a real verification and lookups cannot be told apart
/// by timing.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=65536,t=3,p=4$c2lnbmV0LWR1bW15LXNhbHQ$eHh4eHh4eHh4eHh4eHh4eHh4eHh4eHh4eHh4eHh4eHg";

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

fn hashing_params() -> Result<Params, PasswordError> {
    Params::new(65536, 3, 4, Some(32)).map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// Hash a plaintext password into a PHC string
///
/// The hash embeds algorithm, parameters, and salt; it is the only thing a
/// credential store needs to keep.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        hashing_params()?,
    );

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash
///
/// Returns `Ok(false)` on mismatch; `Err` only for malformed hashes or
/// backend failures.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}

/// Burn the cost of a real verification without a real user
///
/// The result is always a mismatch; the return value only reports that the
/// work ran.
pub fn verify_against_dummy(password: &str) -> bool {
    matches!(verify_password(password, DUMMY_HASH), Ok(false))
}

//! One-way password hashing (bcrypt).
//!
//! Hashing and verification are CPU-bound and run on tokio's blocking pool.

use thiserror::Error;

/// bcrypt cost factor used when none is configured.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password must not be empty")]
    Empty,

    #[error("password must be at most {MAX_PASSWORD_BYTES} bytes")]
    TooLong,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Reject passwords bcrypt cannot represent faithfully.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}

/// Hash a password with a fresh per-hash salt.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| PasswordError::Hashing(format!("task join error: {e}")))?
}

/// Check a password against a stored hash.
///
/// A stored hash that bcrypt cannot parse simply does not match.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| PasswordError::Hashing(format!("task join error: {e}")))
}

//! Salted password hashing
//!
//! Argon2id with a random 16-byte salt per password. Hashes are stored as PHC
//! strings, so the parameters and salt travel with the hash.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

use crate::utils::random_bytes;

const SALT_LEN: usize = 16;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt_bytes = random_bytes(SALT_LEN).map_err(|e| PasswordError::Hash(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// [`hash_password`] on the blocking thread pool
pub async fn hash_password_blocking(password: &str) -> Result<String, PasswordError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::Hash(format!("Hashing task failed: {e}")))?
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_blocking(password: &str, hashed_password: &str) -> bool {
    let (password, hashed_password) = (password.to_string(), hashed_password.to_string());
    match tokio::task::spawn_blocking(move || verify_password(&password, &hashed_password)).await
    {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!("Password verification task failed: {}", e);
            false
        }
    }
}

/// `false` on mismatch and on a hash that does not parse
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    let parsed = match PasswordHash::new(hashed_password) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!("Stored password hash does not parse: {}", e);
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

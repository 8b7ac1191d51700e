//! One-way password hashing with a configurable work factor

use argon2::{
    Algorithm, Argon2, Params, PasswordHasher as _, Version, password_hash::SaltString,
};
use thiserror::Error;

use crate::config::HashingSettings;

/// Error produced by the password hasher
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Invalid hashing parameters: {0}")]
    Params(String),

    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Argon2id hasher producing salted PHC strings
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(settings: &HashingSettings) -> Result<Self, PasswordError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| PasswordError::Params(e.to_string()))?;

        Ok(Self { params })
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }
}

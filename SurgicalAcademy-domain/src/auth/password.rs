//! Password hashing with Argon2id.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::OsRng;
use thiserror::Error;

/// Errors raised while hashing or checking passwords
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    /// The stored hash is not a valid PHC string
    #[error("Stored password hash is malformed: {0}")]
    InvalidHash(String),

    #[error("Invalid Argon2 parameters: {0}")]
    Params(String),

    /// The blocking hashing task panicked or was cancelled
    #[error("Password hashing task failed: {0}")]
    Task(String),
}

/// Argon2id hasher producing PHC strings (`$argon2id$...`)
#[derive(Clone)]
pub struct Passwords {
    argon2: Argon2<'static>,
}

impl Default for Passwords {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Passwords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Passwords").finish_non_exhaustive()
    }
}

impl Passwords {
    /// Argon2id with the crate's recommended parameters
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }

    /// Argon2id with explicit memory (KiB), iteration and parallelism costs
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordError> {
        let params = Params::new(m_cost, t_cost, p_cost, None).map_err(|e| PasswordError::Params(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; errors only for malformed stored hashes
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hash(e.to_string())),
        }
    }

    /// [`Passwords::hash`] on tokio's blocking pool, keeping async workers free
    pub async fn spawn_hash(&self, password: String) -> Result<String, PasswordError> {
        let passwords = self.clone();
        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| PasswordError::Task(e.to_string()))?
    }

    /// [`Passwords::verify`] on tokio's blocking pool
    pub async fn spawn_verify(&self, password: String, stored_hash: String) -> Result<bool, PasswordError> {
        let passwords = self.clone();
        tokio::task::spawn_blocking(move || passwords.verify(&password, &stored_hash))
            .await
            .map_err(|e| PasswordError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Passwords {
        Passwords::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let passwords = cheap();
        let hash = passwords.hash("student123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(passwords.verify("student123", &hash).unwrap());
        assert!(!passwords.verify("student124", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let passwords = cheap();
        assert_ne!(passwords.hash("same").unwrap(), passwords.hash("same").unwrap());
    }

    #[tokio::test]
    async fn test_spawned_hash_and_verify() {
        let passwords = cheap();
        let hash = passwords.spawn_hash("teacher123".to_string()).await.unwrap();

        assert!(passwords.spawn_verify("teacher123".to_string(), hash.clone()).await.unwrap());
        assert!(!passwords.spawn_verify("teacher124".to_string(), hash).await.unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            cheap().verify("anything", "not-a-phc-string"),
            Err(PasswordError::InvalidHash(_))
        ));
    }
}

//! Argon2id implementation of the password hashing port.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
    Argon2,
};

use crate::domain::error::DomainError;
use crate::domain::ports::PasswordHasher;

#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    /// PHC string, salt included.
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| DomainError::password_hash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("hunter2", &hash));
        assert!(!hasher.verify("hunter3", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = Argon2PasswordHasher;
        assert_ne!(hasher.hash("pw").unwrap(), hasher.hash("pw").unwrap());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!Argon2PasswordHasher.verify("pw", "plaintext"));
    }
}

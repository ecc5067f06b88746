use crate::domain::error::DomainError;

/// Output port: one-way password hashing and verification.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, DomainError>;
    /// False for a wrong password or an unreadable hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::ParseSortError;

/// Domain-specific errors.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Post title is required")]
    TitleRequired,

    #[error("Post title too long: {len} characters (max: {max})")]
    TitleTooLong { len: usize, max: usize },

    #[error("Author not found: {id}")]
    UnknownAuthor { id: Uuid },

    #[error("Username is required")]
    UsernameRequired,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Username '{username}' is already taken")]
    UsernameTaken { username: String },

    #[error("Invalid sort: {0}")]
    InvalidSort(#[from] ParseSortError),

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Password hashing failed: {message}")]
    PasswordHash { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn title_too_long(len: usize, max: usize) -> Self {
        Self::TitleTooLong { len, max }
    }

    pub fn unknown_author(id: Uuid) -> Self {
        Self::UnknownAuthor { id }
    }

    pub fn username_taken(username: impl Into<String>) -> Self {
        Self::UsernameTaken {
            username: username.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn password_hash(message: impl Into<String>) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

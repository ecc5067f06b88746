use thiserror::Error;

/// Errors that are safe to expose to other modules.
///
/// "Not found" is not an error: lookups return `None` and deletes report
/// `deleted_count == 0`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlogError {
    /// A required field is missing/invalid or a uniqueness rule was violated.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Store failure (connectivity, internal); details are logged, not exposed.
    #[error("Internal error")]
    Internal,
}

impl BlogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<crate::domain::error::DomainError> for BlogError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            TitleRequired => Self::validation("title: must not be empty"),
            TitleTooLong { len, max } => Self::validation(format!(
                "title: too long: {} characters (max: {})",
                len, max
            )),
            UnknownAuthor { id } => Self::validation(format!("author: no user with id {}", id)),
            UsernameRequired => Self::validation("username: must not be empty"),
            PasswordRequired => Self::validation("password: must not be empty"),
            UsernameTaken { username } => {
                Self::validation(format!("username: '{}' is already taken", username))
            }
            InvalidSort(e) => Self::validation(format!("sortBy: {}", e)),
            Validation { field, message } => Self::validation(format!("{}: {}", field, message)),
            PasswordHash { message } | Database { message } => {
                tracing::error!(error = %message, "Blog operation failed");
                Self::internal()
            }
        }
    }
}

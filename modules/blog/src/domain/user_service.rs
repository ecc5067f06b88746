use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{NewUser, User};
use crate::domain::error::DomainError;
use crate::domain::ports::PasswordHasher;
use crate::domain::post_service::{parse_id, store_error};
use crate::domain::repo::UsersRepository;

/// Minimal user registration and lookup; users are referenced by posts.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UsersRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(users: Arc<dyn UsersRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    #[instrument(
        name = "blog.service.create_user",
        skip(self, new_user),
        fields(username = %new_user.username)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        if new_user.username.trim().is_empty() {
            return Err(DomainError::UsernameRequired);
        }
        if new_user.password.is_empty() {
            return Err(DomainError::PasswordRequired);
        }

        if self
            .users
            .username_exists(&new_user.username)
            .await
            .map_err(store_error)?
        {
            return Err(DomainError::username_taken(new_user.username));
        }

        let hash = self.hasher.hash(&new_user.password)?;

        // The unique index still decides if a concurrent insert won the race.
        let stored = self
            .users
            .insert(&new_user.username, &hash)
            .await
            .map_err(store_error)?
            .ok_or_else(|| DomainError::username_taken(new_user.username.clone()))?;

        info!(user_id = %stored.user.id, "Successfully created user");
        Ok(stored.user)
    }

    #[instrument(name = "blog.service.get_user_by_id", skip(self))]
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let found = self.users.find_by_id(id).await.map_err(store_error)?;
        Ok(found.map(|s| s.user))
    }

    #[instrument(name = "blog.service.get_user_by_username", skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let found = self
            .users
            .find_by_username(username)
            .await
            .map_err(store_error)?;
        Ok(found.map(|s| s.user))
    }

    #[instrument(name = "blog.service.verify_credentials", skip(self, password))]
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(stored) = self
            .users
            .find_by_username(username)
            .await
            .map_err(store_error)?
        else {
            debug!("Unknown username");
            return Ok(None);
        };

        if self.hasher.verify(password, &stored.password_hash) {
            Ok(Some(stored.user))
        } else {
            debug!("Password mismatch");
            Ok(None)
        }
    }
}

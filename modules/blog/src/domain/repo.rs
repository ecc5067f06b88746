use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{NewPost, Post, PostPatch, User};
use crate::domain::query::{PostFilter, PostSort};

/// Persistence port for posts, shaped like a document collection.
///
/// The store generates ids and maintains `created_at`/`updated_at`;
/// the service validates before calling in.
#[async_trait]
pub trait PostsRepository: Send + Sync {
    /// Persist a validated post and return it with id and timestamps.
    async fn insert(&self, author: Uuid, new_post: NewPost) -> anyhow::Result<Post>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Post>>;
    /// Filtered listing; ordering is fully applied by the store.
    async fn find(&self, filter: &PostFilter, sort: PostSort) -> anyhow::Result<Vec<Post>>;
    /// Apply `patch` to the post `id` owned by `author`, bumping `updated_at`.
    /// `None` if there is no such post.
    async fn update_by_id(
        &self,
        id: Uuid,
        author: Uuid,
        patch: PostPatch,
    ) -> anyhow::Result<Option<Post>>;
    /// Number of deleted posts (0 or 1).
    async fn delete_by_id(&self, id: Uuid, author: Uuid) -> anyhow::Result<u64>;
}

/// A user together with its stored password hash. Never leaves the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Persistence port for users.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// `None` if the username is already taken (unique constraint).
    async fn insert(&self, username: &str, password_hash: &str)
        -> anyhow::Result<Option<StoredUser>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<StoredUser>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<StoredUser>>;
    async fn username_exists(&self, username: &str) -> anyhow::Result<bool>;
}

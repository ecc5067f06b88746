use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::BlogError,
    model::{DeleteResult, ListOptions, NewPost, NewUser, Post, PostPatch, User},
};

/// Public posts API that other modules and binaries consume.
///
/// Post ids are taken as strings: an id that is not a valid UUID behaves
/// exactly like an id that does not exist.
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Create a post authored by `author_id`.
    async fn create_post(&self, author_id: Uuid, new_post: NewPost) -> Result<Post, BlogError>;

    /// Every post, ordered per `options`.
    async fn list_all_posts(&self, options: ListOptions) -> Result<Vec<Post>, BlogError>;

    async fn list_posts_by_author(
        &self,
        author_id: Uuid,
        options: ListOptions,
    ) -> Result<Vec<Post>, BlogError>;

    /// Unknown usernames yield an empty list.
    async fn list_posts_by_author_username(
        &self,
        username: &str,
        options: ListOptions,
    ) -> Result<Vec<Post>, BlogError>;

    /// Posts whose tags contain `tag` (exact, case-sensitive).
    async fn list_posts_by_tag(
        &self,
        tag: &str,
        options: ListOptions,
    ) -> Result<Vec<Post>, BlogError>;

    async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>, BlogError>;

    /// `None` when no post with `post_id` is authored by `author_id`.
    async fn update_post(
        &self,
        post_id: &str,
        author_id: Uuid,
        patch: PostPatch,
    ) -> Result<Option<Post>, BlogError>;

    async fn delete_post(&self, post_id: &str, author_id: Uuid) -> Result<DeleteResult, BlogError>;
}

/// Public users API.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<User, BlogError>;

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, BlogError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, BlogError>;

    /// The user when the password matches, `None` otherwise.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, BlogError>;
}

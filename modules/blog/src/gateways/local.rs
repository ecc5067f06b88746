use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    client::{PostsApi, UsersApi},
    error::BlogError,
    model::{DeleteResult, ListOptions, NewPost, NewUser, Post, PostPatch, User},
};
use crate::domain::{post_service::PostService, user_service::UserService};

/// In-process client implementing both public APIs over the domain services.
#[derive(Clone)]
pub struct BlogLocalClient {
    posts: Arc<PostService>,
    users: Arc<UserService>,
}

impl BlogLocalClient {
    pub fn new(posts: Arc<PostService>, users: Arc<UserService>) -> Self {
        Self { posts, users }
    }
}

#[async_trait]
impl PostsApi for BlogLocalClient {
    async fn create_post(&self, author_id: Uuid, new_post: NewPost) -> Result<Post, BlogError> {
        Ok(self.posts.create_post(author_id, new_post).await?)
    }

    async fn list_all_posts(&self, options: ListOptions) -> Result<Vec<Post>, BlogError> {
        Ok(self.posts.list_all_posts(options).await?)
    }

    async fn list_posts_by_author(
        &self,
        author_id: Uuid,
        options: ListOptions,
    ) -> Result<Vec<Post>, BlogError> {
        Ok(self.posts.list_posts_by_author(author_id, options).await?)
    }

    async fn list_posts_by_author_username(
        &self,
        username: &str,
        options: ListOptions,
    ) -> Result<Vec<Post>, BlogError> {
        Ok(self
            .posts
            .list_posts_by_author_username(username, options)
            .await?)
    }

    async fn list_posts_by_tag(
        &self,
        tag: &str,
        options: ListOptions,
    ) -> Result<Vec<Post>, BlogError> {
        Ok(self.posts.list_posts_by_tag(tag, options).await?)
    }

    async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>, BlogError> {
        Ok(self.posts.get_post_by_id(id).await?)
    }

    async fn update_post(
        &self,
        post_id: &str,
        author_id: Uuid,
        patch: PostPatch,
    ) -> Result<Option<Post>, BlogError> {
        Ok(self.posts.update_post(post_id, author_id, patch).await?)
    }

    async fn delete_post(&self, post_id: &str, author_id: Uuid) -> Result<DeleteResult, BlogError> {
        Ok(self.posts.delete_post(post_id, author_id).await?)
    }
}

#[async_trait]
impl UsersApi for BlogLocalClient {
    async fn create_user(&self, new_user: NewUser) -> Result<User, BlogError> {
        Ok(self.users.create_user(new_user).await?)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, BlogError> {
        Ok(self.users.get_user_by_id(id).await?)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, BlogError> {
        Ok(self.users.get_user_by_username(username).await?)
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, BlogError> {
        Ok(self.users.verify_credentials(username, password).await?)
    }
}

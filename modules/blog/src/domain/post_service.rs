use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{DeleteResult, ListOptions, NewPost, Post, PostPatch};
use crate::domain::error::DomainError;
use crate::domain::query::{PostFilter, PostSort};
use crate::domain::repo::{PostsRepository, UsersRepository};

/// Post CRUD rules. Stateless apart from its repository handles.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostsRepository>,
    users: Arc<dyn UsersRepository>,
    config: PostServiceConfig,
}

#[derive(Debug, Clone)]
pub struct PostServiceConfig {
    pub max_title_length: usize,
    /// Applied to the parts of `ListOptions` a caller leaves unset.
    pub default_sort: PostSort,
}

impl Default for PostServiceConfig {
    fn default() -> Self {
        Self {
            max_title_length: 200,
            default_sort: PostSort::default(),
        }
    }
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostsRepository>,
        users: Arc<dyn UsersRepository>,
        config: PostServiceConfig,
    ) -> Self {
        Self {
            posts,
            users,
            config,
        }
    }

    #[instrument(
        name = "blog.service.create_post",
        skip(self, new_post),
        fields(author_id = %author_id, tags = new_post.tags.len())
    )]
    pub async fn create_post(&self, author_id: Uuid, new_post: NewPost) -> Result<Post, DomainError> {
        info!("Creating post");

        self.validate_title(&new_post.title)?;

        let author = self
            .users
            .find_by_id(author_id)
            .await
            .map_err(store_error)?;
        if author.is_none() {
            return Err(DomainError::unknown_author(author_id));
        }

        let post = self
            .posts
            .insert(author_id, new_post)
            .await
            .map_err(store_error)?;

        info!(post_id = %post.id, "Successfully created post");
        Ok(post)
    }

    #[instrument(name = "blog.service.list_all_posts", skip(self))]
    pub async fn list_all_posts(&self, options: ListOptions) -> Result<Vec<Post>, DomainError> {
        self.list(PostFilter::All, options).await
    }

    #[instrument(
        name = "blog.service.list_posts_by_author",
        skip(self),
        fields(author_id = %author_id)
    )]
    pub async fn list_posts_by_author(
        &self,
        author_id: Uuid,
        options: ListOptions,
    ) -> Result<Vec<Post>, DomainError> {
        self.list(PostFilter::Author(author_id), options).await
    }

    /// Resolve `username` first; an unknown user simply has no posts.
    #[instrument(name = "blog.service.list_posts_by_author_username", skip(self))]
    pub async fn list_posts_by_author_username(
        &self,
        username: &str,
        options: ListOptions,
    ) -> Result<Vec<Post>, DomainError> {
        let Some(author) = self
            .users
            .find_by_username(username)
            .await
            .map_err(store_error)?
        else {
            debug!("No user with this username");
            return Ok(Vec::new());
        };
        self.list(PostFilter::Author(author.user.id), options).await
    }

    #[instrument(name = "blog.service.list_posts_by_tag", skip(self))]
    pub async fn list_posts_by_tag(
        &self,
        tag: &str,
        options: ListOptions,
    ) -> Result<Vec<Post>, DomainError> {
        self.list(PostFilter::Tag(tag.to_string()), options).await
    }

    /// Malformed ids are "not found", not an error.
    #[instrument(name = "blog.service.get_post_by_id", skip(self))]
    pub async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>, DomainError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        self.posts.find_by_id(id).await.map_err(store_error)
    }

    /// Only the author may update; anyone else gets `None` as if the post
    /// did not exist. `updated_at` advances even for an empty patch.
    #[instrument(
        name = "blog.service.update_post",
        skip(self, patch),
        fields(author_id = %author_id)
    )]
    pub async fn update_post(
        &self,
        post_id: &str,
        author_id: Uuid,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        info!("Updating post");

        if let Some(title) = patch.title.as_deref() {
            self.validate_title(title)?;
        }
        let Some(id) = parse_id(post_id) else {
            debug!("Malformed post id");
            return Ok(None);
        };
        if patch.is_empty() {
            debug!("Empty patch, only updated_at advances");
        }

        let updated = self
            .posts
            .update_by_id(id, author_id, patch)
            .await
            .map_err(store_error)?;

        match &updated {
            Some(_) => info!("Successfully updated post"),
            None => debug!("No post owned by this author"),
        }
        Ok(updated)
    }

    #[instrument(
        name = "blog.service.delete_post",
        skip(self),
        fields(author_id = %author_id)
    )]
    pub async fn delete_post(
        &self,
        post_id: &str,
        author_id: Uuid,
    ) -> Result<DeleteResult, DomainError> {
        info!("Deleting post");

        let Some(id) = parse_id(post_id) else {
            return Ok(DeleteResult::default());
        };
        let deleted_count = self
            .posts
            .delete_by_id(id, author_id)
            .await
            .map_err(store_error)?;

        info!(deleted_count, "Delete finished");
        Ok(DeleteResult { deleted_count })
    }

    async fn list(&self, filter: PostFilter, options: ListOptions) -> Result<Vec<Post>, DomainError> {
        let sort = self.config.default_sort.resolve(options);
        debug!(sort_by = %sort.field, sort_order = %sort.order, "Listing posts");

        let posts = self.posts.find(&filter, sort).await.map_err(store_error)?;

        debug!("Listed {} posts", posts.len());
        Ok(posts)
    }

    fn validate_title(&self, title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::TitleRequired);
        }
        let len = title.chars().count();
        if len > self.config.max_title_length {
            return Err(DomainError::title_too_long(len, self.config.max_title_length));
        }
        Ok(())
    }
}

pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

pub(crate) fn store_error(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_only_uuids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id(&format!(" {id} ")), Some(id));
        assert_eq!(parse_id("5f1a2b3c4d5e6f7a8b9c0d1e"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn store_error_keeps_context_chain() {
        let e = anyhow::anyhow!("connection refused").context("find failed");
        match store_error(e) {
            DomainError::Database { message } => {
                assert!(message.contains("find failed"));
                assert!(message.contains("connection refused"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

//! Serializable views of the contract models, shaped like the stored documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{DeleteResult, Post, User};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contents: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Users never carry their password hash outward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResultDto {
    pub deleted_count: u64,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            author: post.author,
            contents: post.contents,
            tags: post.tags,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<DeleteResult> for DeleteResultDto {
    fn from(r: DeleteResult) -> Self {
        Self {
            deleted_count: r.deleted_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn post_dto_uses_document_field_names() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let dto = PostDto::from(Post {
            id: Uuid::nil(),
            title: "Hello".into(),
            author: Uuid::nil(),
            contents: None,
            tags: vec!["rust".into()],
            created_at: at,
            updated_at: at,
        });

        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["title"], "Hello");
        assert_eq!(v["tags"][0], "rust");
        assert_eq!(v["createdAt"], "2025-01-02T03:04:05Z");
        assert!(v.get("updatedAt").is_some());
        assert!(v.get("contents").is_none());
    }

    #[test]
    fn delete_result_dto_is_camel_case() {
        let v = serde_json::to_value(DeleteResultDto::from(DeleteResult { deleted_count: 1 }))
            .unwrap();
        assert_eq!(v, serde_json::json!({ "deletedCount": 1 }));
    }
}

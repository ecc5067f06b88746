use crate::contract::model::{Post, User};
use crate::domain::repo::StoredUser;
use crate::infra::storage::entity::{post, user};

/// Assemble a contract post from its row and its ordered tags.
pub fn post_to_contract(model: post::Model, tags: Vec<String>) -> Post {
    Post {
        id: model.id,
        title: model.title,
        author: model.author,
        contents: model.contents,
        tags,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

impl From<user::Model> for StoredUser {
    fn from(m: user::Model) -> Self {
        Self {
            user: User {
                id: m.id,
                username: m.username,
                created_at: m.created_at,
                updated_at: m.updated_at,
            },
            password_hash: m.password,
        }
    }
}

//! SeaORM-backed repository implementations for the domain ports.
//!
//! Both repositories are generic over the connection type. The posts
//! repository writes a post row and its tag rows together, so it also needs
//! `TransactionTrait` to open a transaction on whatever it was given.

use std::collections::HashMap;

use anyhow::Context;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{NewPost, Post, PostPatch, SortField, SortOrder};
use crate::domain::query::{PostFilter, PostSort};
use crate::domain::repo::{PostsRepository, StoredUser, UsersRepository};
use crate::infra::storage::clock;
use crate::infra::storage::entity::{post, post_tag, user};
use crate::infra::storage::mapper::post_to_contract;

/// Posts repository. Holds a connection object; its lifetime is up to the caller.
pub struct SeaOrmPostsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmPostsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn sort_column(field: SortField) -> post::Column {
    match field {
        SortField::CreatedAt => post::Column::CreatedAt,
        SortField::UpdatedAt => post::Column::UpdatedAt,
        SortField::Title => post::Column::Title,
    }
}

fn sort_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Ascending => Order::Asc,
        SortOrder::Descending => Order::Desc,
    }
}

fn apply_filter(select: Select<post::Entity>, filter: &PostFilter) -> Select<post::Entity> {
    match filter {
        PostFilter::All => select,
        PostFilter::Author(author) => select.filter(post::Column::Author.eq(*author)),
        PostFilter::Tag(tag) => select.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_tag::Column::PostId)
                    .from(post_tag::Entity)
                    .and_where(post_tag::Column::Tag.eq(tag.as_str()))
                    .to_owned(),
            ),
        ),
    }
}

async fn insert_tags<C>(conn: &C, post_id: Uuid, tags: &[String]) -> anyhow::Result<()>
where
    C: ConnectionTrait,
{
    // insert_many with no rows is an error, not a no-op.
    if tags.is_empty() {
        return Ok(());
    }
    let rows = tags.iter().enumerate().map(|(position, tag)| post_tag::ActiveModel {
        post_id: Set(post_id),
        position: Set(position as i32),
        tag: Set(tag.clone()),
    });
    post_tag::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await
        .context("insert tags failed")?;
    Ok(())
}

/// Tags of every post in `ids`, each list in stored position order.
async fn load_tags<C>(conn: &C, ids: Vec<Uuid>) -> anyhow::Result<HashMap<Uuid, Vec<String>>>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.is_in(ids))
        .order_by_asc(post_tag::Column::PostId)
        .order_by_asc(post_tag::Column::Position)
        .all(conn)
        .await
        .context("load tags failed")?;

    let mut by_post: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in rows {
        by_post.entry(row.post_id).or_default().push(row.tag);
    }
    Ok(by_post)
}

async fn find_owned<C>(conn: &C, id: Uuid, author: Uuid) -> anyhow::Result<Option<post::Model>>
where
    C: ConnectionTrait,
{
    post::Entity::find_by_id(id)
        .filter(post::Column::Author.eq(author))
        .one(conn)
        .await
        .context("find owned post failed")
}

#[async_trait::async_trait]
impl<C> PostsRepository for SeaOrmPostsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn insert(&self, author: Uuid, new_post: NewPost) -> anyhow::Result<Post> {
        let now = clock::now();
        let id = Uuid::new_v4();

        let txn = self.conn.begin().await.context("begin failed")?;
        let row = post::ActiveModel {
            id: Set(id),
            title: Set(new_post.title.clone()),
            author: Set(author),
            contents: Set(new_post.contents.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        post::Entity::insert(row)
            .exec_without_returning(&txn)
            .await
            .context("insert post failed")?;
        insert_tags(&txn, id, &new_post.tags).await?;
        txn.commit().await.context("commit failed")?;

        Ok(Post {
            id,
            title: new_post.title,
            author,
            contents: new_post.contents,
            tags: new_post.tags,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        let Some(found) = post::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?
        else {
            return Ok(None);
        };
        let mut tags = load_tags(&self.conn, vec![id]).await?;
        let tags = tags.remove(&id).unwrap_or_default();
        Ok(Some(post_to_contract(found, tags)))
    }

    async fn find(&self, filter: &PostFilter, sort: PostSort) -> anyhow::Result<Vec<Post>> {
        let rows = apply_filter(post::Entity::find(), filter)
            .order_by(sort_column(sort.field), sort_order(sort.order))
            .order_by_asc(post::Column::Id)
            .all(&self.conn)
            .await
            .context("find posts failed")?;

        let mut tags = load_tags(&self.conn, rows.iter().map(|r| r.id).collect()).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let post_tags = tags.remove(&row.id).unwrap_or_default();
                post_to_contract(row, post_tags)
            })
            .collect())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        author: Uuid,
        patch: PostPatch,
    ) -> anyhow::Result<Option<Post>> {
        let txn = self.conn.begin().await.context("begin failed")?;
        let Some(current) = find_owned(&txn, id, author).await? else {
            txn.rollback().await.context("rollback failed")?;
            return Ok(None);
        };

        let updated_at = clock::stamp_after(current.updated_at);
        let mut row: post::ActiveModel = current.into();
        if let Some(title) = patch.title {
            row.title = Set(title);
        }
        if let Some(contents) = patch.contents {
            row.contents = Set(contents);
        }
        row.updated_at = Set(updated_at);
        let saved = row.update(&txn).await.context("update post failed")?;

        let tags = match patch.tags {
            Some(tags) => {
                post_tag::Entity::delete_many()
                    .filter(post_tag::Column::PostId.eq(id))
                    .exec(&txn)
                    .await
                    .context("clear tags failed")?;
                insert_tags(&txn, id, &tags).await?;
                tags
            }
            None => load_tags(&txn, vec![id])
                .await?
                .remove(&id)
                .unwrap_or_default(),
        };
        txn.commit().await.context("commit failed")?;

        Ok(Some(post_to_contract(saved, tags)))
    }

    async fn delete_by_id(&self, id: Uuid, author: Uuid) -> anyhow::Result<u64> {
        let txn = self.conn.begin().await.context("begin failed")?;
        if find_owned(&txn, id, author).await?.is_none() {
            txn.rollback().await.context("rollback failed")?;
            return Ok(0);
        }

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .context("delete tags failed")?;
        let res = post::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete post failed")?;
        txn.commit().await.context("commit failed")?;

        Ok(res.rows_affected)
    }
}

/// Users repository.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<StoredUser>> {
        let now = clock::now();
        let m = user::Model {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        let row = user::ActiveModel {
            id: Set(m.id),
            username: Set(m.username.clone()),
            password: Set(m.password.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        match user::Entity::insert(row)
            .exec_without_returning(&self.conn)
            .await
        {
            Ok(_) => Ok(Some(m.into())),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("insert user failed")),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<StoredUser>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<StoredUser>> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("find_by_username failed")?;
        Ok(found.map(Into::into))
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.conn)
            .await
            .context("username_exists failed")?;
        Ok(count > 0)
    }
}

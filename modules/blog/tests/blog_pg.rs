#![cfg(feature = "integration")]

mod common;

use std::sync::Arc;

use anyhow::Result;
use blog::contract::model::{ListOptions, NewPost, PostPatch, SortField, SortOrder};
use blog::{Blog, BlogConfig};
use blog_db::{ConnectOpts, DbHandle};

#[tokio::test]
async fn blog_works_with_postgres() -> Result<()> {
    let dut = common::bring_up_postgres().await?;

    let db = DbHandle::connect(&dut.url, ConnectOpts::default()).await?;
    Blog::migrate(&db)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    let blog = Blog::with_hasher(db.sea(), &BlogConfig::default(), Arc::new(common::PlainHasher))?;
    let posts = blog.posts_api();
    let users = blog.users_api();

    let alice = common::seed_user(users.as_ref(), "alice").await?;
    assert!(common::seed_user(users.as_ref(), "alice").await.is_err());

    let first = posts
        .create_post(
            alice.id,
            NewPost {
                title: "b".into(),
                contents: None,
                tags: vec!["pg".into(), "pg".into()],
            },
        )
        .await?;
    common::tick().await;
    posts
        .create_post(
            alice.id,
            NewPost {
                title: "a".into(),
                ..Default::default()
            },
        )
        .await?;

    let fetched = posts.get_post_by_id(&first.id.to_string()).await?;
    assert_eq!(fetched, Some(first.clone()));

    let by_tag = posts.list_posts_by_tag("pg", ListOptions::default()).await?;
    assert_eq!(by_tag.len(), 1);

    let by_title = posts
        .list_all_posts(ListOptions::sorted(SortField::Title, SortOrder::Ascending))
        .await?;
    assert_eq!(by_title[0].title, "a");

    let updated = posts
        .update_post(&first.id.to_string(), alice.id, PostPatch::default())
        .await?
        .expect("author may update");
    assert!(updated.updated_at > first.updated_at);

    assert_eq!(
        posts
            .delete_post(&first.id.to_string(), alice.id)
            .await?
            .deleted_count,
        1
    );
    assert!(posts.list_posts_by_tag("pg", ListOptions::default()).await?.is_empty());

    db.close().await;
    Ok(())
}

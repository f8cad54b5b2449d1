//! Integration tests for the PostgreSQL store.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -p blog --test database_integration`
//!
//! The tests work inside their own `blog_store_test` schema, creating the
//! tables they need, so they can safely run against a development database.
//! They are skipped when DATABASE_URL is not set.

use std::env;

use blog::models::{NewPost, NewUser, PostChanges, PostStatus, RoleCode};
use blog::{BlogStore, Database};
use sqlx::{Executor, PgPool, postgres::PgPoolOptions};
use time::OffsetDateTime;
use tokio::sync::OnceCell;

static SCHEMA_READY: OnceCell<()> = OnceCell::const_new();

const SCHEMA: &str = r#"
CREATE SCHEMA IF NOT EXISTS blog_store_test;
CREATE TABLE IF NOT EXISTS blog_store_test.users (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS blog_store_test.roles (
    id BIGSERIAL PRIMARY KEY,
    role_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS blog_store_test.role_user (
    user_id BIGINT NOT NULL REFERENCES blog_store_test.users(id),
    role_id BIGINT NOT NULL REFERENCES blog_store_test.roles(id),
    PRIMARY KEY (user_id, role_id)
);
CREATE TABLE IF NOT EXISTS blog_store_test.categories (
    id BIGSERIAL PRIMARY KEY,
    category_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS blog_store_test.posts (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT REFERENCES blog_store_test.users(id),
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL,
    featured_image_url TEXT,
    publication_date TIMESTAMPTZ,
    views_count INTEGER,
    featured_post BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS blog_store_test.category_post (
    post_id BIGINT NOT NULL REFERENCES blog_store_test.posts(id),
    category_id BIGINT NOT NULL REFERENCES blog_store_test.categories(id),
    PRIMARY KEY (post_id, category_id)
);
"#;

/// Get database pool, skipping tests if DATABASE_URL is not set.
async fn get_test_pool() -> Option<PgPool> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET search_path TO blog_store_test").await?;
                Ok(())
            })
        })
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            return None;
        }
    };

    SCHEMA_READY
        .get_or_init(|| async {
            sqlx::raw_sql(SCHEMA)
                .execute(&pool)
                .await
                .expect("Failed to create test schema");
        })
        .await;

    Some(pool)
}

fn unique_tag() -> String {
    format!("{}", OffsetDateTime::now_utc().unix_timestamp_nanos())
}

fn new_post(tag: &str, user_id: Option<i64>, published: bool) -> NewPost {
    NewPost {
        user_id,
        title: format!("Post {tag}"),
        content: "Integration test body".to_string(),
        slug: format!("post-{tag}-{published}"),
        status: if published {
            PostStatus::Published
        } else {
            PostStatus::Draft
        },
        featured_image_url: None,
        publication_date: published.then(OffsetDateTime::now_utc),
        views_count: published.then_some(42),
    }
}

#[tokio::test]
async fn test_users_and_roles() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let db = Database::new(pool);
    let tag = unique_tag();

    let users = db
        .create_users(&[
            NewUser {
                name: "First".to_string(),
                email: format!("first-{tag}@example.com"),
                password: "hash".to_string(),
            },
            NewUser {
                name: "Second".to_string(),
                email: format!("second-{tag}@example.com"),
                password: "hash".to_string(),
            },
        ])
        .await
        .expect("Failed to create users");

    assert_eq!(users.len(), 2);
    assert!(users[0].id < users[1].id);
    assert_eq!(users[0].name, "First");

    let admin = db
        .upsert_role(RoleCode::Admin)
        .await
        .expect("Failed to upsert role");
    let again = db
        .upsert_role(RoleCode::Admin)
        .await
        .expect("Failed to upsert role");
    assert_eq!(admin.id, again.id);

    let found = db
        .find_role(RoleCode::Admin)
        .await
        .expect("Failed to find role")
        .expect("Role not found");
    assert_eq!(found.code(), Some(RoleCode::Admin));

    db.attach_roles(users[0].id, &[admin.id])
        .await
        .expect("Failed to attach role");
    assert!(db.attach_roles(users[0].id, &[admin.id]).await.is_err());
}

#[tokio::test]
async fn test_posts_categories_and_featured() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let db = Database::new(pool);
    let tag = unique_tag();

    let category = db
        .upsert_category(&format!("Category {tag}"))
        .await
        .expect("Failed to upsert category");

    let draft = db
        .create_post(&new_post(&tag, None, false))
        .await
        .expect("Failed to create draft");
    assert!(!draft.is_published());
    assert!(draft.views_count.is_none());
    assert!(!draft.featured_post);

    let published = db
        .create_post(&new_post(&tag, None, true))
        .await
        .expect("Failed to create published post");
    assert_eq!(published.status(), Some(PostStatus::Published));

    db.attach_categories(published.id, &[category.id])
        .await
        .expect("Failed to attach category");

    let picked = db
        .random_published_post()
        .await
        .expect("Failed to pick post")
        .expect("No published post");
    assert!(picked.is_published());

    db.clear_featured_posts()
        .await
        .expect("Failed to clear featured");
    let featured = db
        .update_post(published.id, PostChanges::featured())
        .await
        .expect("Failed to update post");
    assert!(featured.featured_post);

    let popular = db.most_popular(1_000_000).await.expect("Failed to list popular");
    let entry = popular
        .iter()
        .find(|p| p.id == published.id)
        .expect("Published post missing from popular list");
    assert_eq!(entry.category_name.as_deref(), Some(category.category_name.as_str()));
    assert!(popular.iter().all(|p| p.id != draft.id));

    assert!(db.update_post(-1, PostChanges::featured()).await.is_err());
}

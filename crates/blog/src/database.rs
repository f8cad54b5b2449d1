use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::models::{
    Category, NewPost, NewUser, PopularPost, Post, PostChanges, Role, RoleCode, User,
};
use crate::store::BlogStore;

const POST_COLUMNS: &str = "id, user_id, title, content, slug, status, featured_image_url, \
                            publication_date, views_count, featured_post, created_at";

/// PostgreSQL-backed store. The schema is owned by the application's migrations.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BlogStore for Database {
    async fn create_users(&self, users: &[NewUser]) -> Result<Vec<User>, StoreError> {
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
        let passwords: Vec<&str> = users.iter().map(|u| u.password.as_str()).collect();

        let mut created: Vec<User> = sqlx::query_as(
            r#"
            INSERT INTO users (name, email, password, created_at)
            SELECT t.name, t.email, t.password, NOW()
            FROM UNNEST($1::text[], $2::text[], $3::text[]) WITH ORDINALITY
                AS t(name, email, password, ord)
            ORDER BY t.ord
            RETURNING id, name, email, password, created_at
            "#,
        )
        .bind(&names)
        .bind(&emails)
        .bind(&passwords)
        .fetch_all(&self.pool)
        .await?;

        // Ids follow insertion order
        created.sort_by_key(|u| u.id);
        debug!("Inserted {} users", created.len());
        Ok(created)
    }

    async fn all_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn all_categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories = sqlx::query_as("SELECT id, category_name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    async fn find_role(&self, code: RoleCode) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as(
            "SELECT id, role_name FROM roles WHERE role_name = $1 ORDER BY id LIMIT 1",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let query = format!(
            r#"
            INSERT INTO posts (user_id, title, content, slug, status, featured_image_url,
                               publication_date, views_count, featured_post, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, false, NOW())
            RETURNING {POST_COLUMNS}
            "#
        );

        let created = sqlx::query_as(&query)
            .bind(post.user_id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.slug)
            .bind(post.status.as_str())
            .bind(&post.featured_image_url)
            .bind(post.publication_date)
            .bind(post.views_count)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn attach_roles(&self, user_id: i64, role_ids: &[i64]) -> Result<(), StoreError> {
        if role_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO role_user (user_id, role_id)
            SELECT $1, UNNEST($2::bigint[])
            "#,
        )
        .bind(user_id)
        .bind(role_ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn attach_categories(
        &self,
        post_id: i64,
        category_ids: &[i64],
    ) -> Result<(), StoreError> {
        if category_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO category_post (post_id, category_id)
            SELECT $1, UNNEST($2::bigint[])
            "#,
        )
        .bind(post_id)
        .bind(category_ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn random_published_post(&self) -> Result<Option<Post>, StoreError> {
        let query = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE publication_date IS NOT NULL
            ORDER BY random()
            LIMIT 1
            "#
        );

        let post = sqlx::query_as(&query).fetch_optional(&self.pool).await?;
        Ok(post)
    }

    async fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Post, StoreError> {
        let query = format!(
            r#"
            UPDATE posts
            SET featured_post = COALESCE($2, featured_post)
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        );

        let post: Option<Post> = sqlx::query_as(&query)
            .bind(post_id)
            .bind(changes.featured_post)
            .fetch_optional(&self.pool)
            .await?;

        post.ok_or(StoreError::NotFound {
            entity: "post",
            id: post_id,
        })
    }

    async fn clear_featured_posts(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE posts SET featured_post = false WHERE featured_post")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn upsert_role(&self, code: RoleCode) -> Result<Role, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO roles (role_name)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM roles WHERE role_name = $1)
            "#,
        )
        .bind(code.as_str())
        .execute(&self.pool)
        .await?;

        let role = sqlx::query_as(
            "SELECT id, role_name FROM roles WHERE role_name = $1 ORDER BY id LIMIT 1",
        )
        .bind(code.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(role)
    }

    async fn upsert_category(&self, name: &str) -> Result<Category, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO categories (category_name)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM categories WHERE category_name = $1)
            "#,
        )
        .bind(name)
        .execute(&self.pool)
        .await?;

        let category = sqlx::query_as(
            "SELECT id, category_name FROM categories WHERE category_name = $1 ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn most_popular(&self, limit: usize) -> Result<Vec<PopularPost>, StoreError> {
        let posts = sqlx::query_as(
            r#"
            SELECT p.id, p.title, u.name AS author_name,
                   (SELECT c.category_name
                    FROM category_post cp
                    JOIN categories c ON c.id = cp.category_id
                    WHERE cp.post_id = p.id
                    ORDER BY c.id
                    LIMIT 1) AS category_name,
                   p.publication_date, p.views_count
            FROM posts p
            LEFT JOIN users u ON u.id = p.user_id
            WHERE p.publication_date IS NOT NULL
            ORDER BY p.views_count DESC NULLS LAST, p.id
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn clear_seeded(&self) -> Result<(), StoreError> {
        info!("Clearing seeded users and posts...");

        // Order matters due to foreign key constraints
        sqlx::query("DELETE FROM category_post")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM posts").execute(&self.pool).await?;
        sqlx::query("DELETE FROM role_user")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;

        info!("Seeded data cleared");
        Ok(())
    }
}

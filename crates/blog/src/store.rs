//! The data store seam used by seeding and the rest of the application.
//!
//! [`BlogStore`] is implemented by [`crate::database::Database`] for PostgreSQL
//! and by [`crate::memory::MemoryStore`] for tests and dry runs.

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::{
    Category, NewPost, NewUser, PopularPost, Post, PostChanges, Role, RoleCode, User,
};

/// Create/read/update/attach operations over users, roles, categories and posts.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Inserts users in one round-trip and returns them in input order with ids assigned.
    async fn create_users(&self, users: &[NewUser]) -> Result<Vec<User>, StoreError>;

    /// Returns every user ordered by id.
    async fn all_users(&self) -> Result<Vec<User>, StoreError>;

    /// Returns every category ordered by id.
    async fn all_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn find_role(&self, code: RoleCode) -> Result<Option<Role>, StoreError>;

    async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError>;

    /// Links a user to each role id. Linking the same pair twice is an error.
    async fn attach_roles(&self, user_id: i64, role_ids: &[i64]) -> Result<(), StoreError>;

    /// Links a post to each category id. Linking the same pair twice is an error.
    async fn attach_categories(
        &self,
        post_id: i64,
        category_ids: &[i64],
    ) -> Result<(), StoreError>;

    /// Picks one post with a publication date uniformly at random.
    async fn random_published_post(&self) -> Result<Option<Post>, StoreError>;

    async fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Post, StoreError>;

    /// Unsets `featured_post` everywhere and returns how many posts were affected.
    async fn clear_featured_posts(&self) -> Result<u64, StoreError>;

    /// Inserts the role if no role with this code exists yet.
    async fn upsert_role(&self, code: RoleCode) -> Result<Role, StoreError>;

    /// Inserts the category if no category with this name exists yet.
    async fn upsert_category(&self, name: &str) -> Result<Category, StoreError>;

    /// Published posts ordered by views, most viewed first.
    async fn most_popular(&self, limit: usize) -> Result<Vec<PopularPost>, StoreError>;

    /// Deletes users, posts and their links. Roles and categories are kept.
    async fn clear_seeded(&self) -> Result<(), StoreError>;
}

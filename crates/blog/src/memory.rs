//! In-memory [`BlogStore`] for tests and dry runs.
//!
//! Mirrors the PostgreSQL store's behavior closely enough for seeding logic:
//! ids are assigned on insert, association pairs are unique and a failed attach
//! writes nothing, and [`MemoryStore::set_unavailable`] makes every call fail like
//! a dropped connection.

use std::cmp::Reverse;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use time::OffsetDateTime;

use crate::errors::StoreError;
use crate::models::{
    Category, NewPost, NewUser, PopularPost, Post, PostChanges, Role, RoleCode, User,
};
use crate::store::BlogStore;

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: Vec<User>,
    roles: Vec<Role>,
    categories: Vec<Category>,
    posts: Vec<Post>,
    /// (user_id, role_id)
    role_user: Vec<(i64, i64)>,
    /// (post_id, category_id)
    category_post: Vec<(i64, i64)>,
    /// Source for random picks; `None` uses the thread RNG.
    rng: Option<StdRng>,
    unavailable: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn insert_role(&mut self, code: RoleCode) -> Role {
        let role = Role {
            id: self.next_id(),
            role_name: code.as_str().to_string(),
        };
        self.roles.push(role.clone());
        role
    }

    fn insert_category(&mut self, name: &str) -> Category {
        let category = Category {
            id: self.next_id(),
            category_name: name.to_string(),
        };
        self.categories.push(category.clone());
        category
    }
}

/// Links `owner_id` to every target, or to none of them if any pair is a duplicate.
fn link_all(
    links: &mut Vec<(i64, i64)>,
    relation: &'static str,
    owner_id: i64,
    target_ids: &[i64],
) -> Result<(), StoreError> {
    for (i, &target_id) in target_ids.iter().enumerate() {
        if links.contains(&(owner_id, target_id)) || target_ids[..i].contains(&target_id) {
            return Err(StoreError::Duplicate {
                relation,
                owner_id,
                target_id,
            });
        }
    }

    links.extend(target_ids.iter().map(|&target_id| (owner_id, target_id)));
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given roles as pre-existing reference data.
    pub fn with_roles(self, codes: &[RoleCode]) -> Self {
        {
            let mut state = self.state();
            for &code in codes {
                state.insert_role(code);
            }
        }
        self
    }

    /// Adds the given categories as pre-existing reference data.
    pub fn with_categories<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        {
            let mut state = self.state();
            for name in names {
                state.insert_category(name.as_ref());
            }
        }
        self
    }

    /// Makes random picks reproducible by drawing them from a seeded RNG.
    pub fn with_rng_seed(self, seed: u64) -> Self {
        self.state().rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// When set, every store call fails with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    pub fn users(&self) -> Vec<User> {
        self.state().users.clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.state().posts.clone()
    }

    /// Role codes linked to a user, in link order.
    pub fn roles_of(&self, user_id: i64) -> Vec<RoleCode> {
        let state = self.state();
        state
            .role_user
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, role_id)| state.roles.iter().find(|r| r.id == *role_id))
            .filter_map(Role::code)
            .collect()
    }

    /// Category ids linked to a post, in link order.
    pub fn categories_of(&self, post_id: i64) -> Vec<i64> {
        self.state()
            .category_post
            .iter()
            .filter(|(pid, _)| *pid == post_id)
            .map(|(_, category_id)| *category_id)
            .collect()
    }

    /// Total number of user/role links.
    pub fn role_link_count(&self) -> usize {
        self.state().role_user.len()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn available_state(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        let state = self.state();
        if state.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(state)
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn create_users(&self, users: &[NewUser]) -> Result<Vec<User>, StoreError> {
        let mut state = self.available_state()?;
        let now = OffsetDateTime::now_utc();

        let created: Vec<User> = users
            .iter()
            .map(|user| User {
                id: state.next_id(),
                name: user.name.clone(),
                email: user.email.clone(),
                password: user.password.clone(),
                created_at: now,
            })
            .collect();

        state.users.extend(created.iter().cloned());
        Ok(created)
    }

    async fn all_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.available_state()?.users.clone())
    }

    async fn all_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.available_state()?.categories.clone())
    }

    async fn find_role(&self, code: RoleCode) -> Result<Option<Role>, StoreError> {
        let state = self.available_state()?;
        Ok(state
            .roles
            .iter()
            .find(|role| role.code() == Some(code))
            .cloned())
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let mut state = self.available_state()?;

        let created = Post {
            id: state.next_id(),
            user_id: post.user_id,
            title: post.title.clone(),
            content: post.content.clone(),
            slug: post.slug.clone(),
            status: post.status.as_str().to_string(),
            featured_image_url: post.featured_image_url.clone(),
            publication_date: post.publication_date,
            views_count: post.views_count,
            featured_post: false,
            created_at: OffsetDateTime::now_utc(),
        };

        state.posts.push(created.clone());
        Ok(created)
    }

    async fn attach_roles(&self, user_id: i64, role_ids: &[i64]) -> Result<(), StoreError> {
        let mut state = self.available_state()?;
        link_all(&mut state.role_user, "role_user", user_id, role_ids)
    }

    async fn attach_categories(
        &self,
        post_id: i64,
        category_ids: &[i64],
    ) -> Result<(), StoreError> {
        let mut state = self.available_state()?;
        link_all(&mut state.category_post, "category_post", post_id, category_ids)
    }

    async fn random_published_post(&self) -> Result<Option<Post>, StoreError> {
        let mut guard = self.available_state()?;
        let state = &mut *guard;
        let published: Vec<&Post> = state.posts.iter().filter(|p| p.is_published()).collect();

        let picked = match state.rng.as_mut() {
            Some(rng) => published.choose(rng),
            None => published.choose(&mut rand::thread_rng()),
        };
        Ok(picked.map(|post| (*post).clone()))
    }

    async fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Post, StoreError> {
        let mut state = self.available_state()?;

        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(StoreError::NotFound {
                entity: "post",
                id: post_id,
            })?;

        if let Some(featured) = changes.featured_post {
            post.featured_post = featured;
        }

        Ok(post.clone())
    }

    async fn clear_featured_posts(&self) -> Result<u64, StoreError> {
        let mut state = self.available_state()?;
        let mut cleared = 0;

        for post in state.posts.iter_mut().filter(|p| p.featured_post) {
            post.featured_post = false;
            cleared += 1;
        }

        Ok(cleared)
    }

    async fn upsert_role(&self, code: RoleCode) -> Result<Role, StoreError> {
        let mut state = self.available_state()?;

        if let Some(role) = state.roles.iter().find(|r| r.code() == Some(code)) {
            return Ok(role.clone());
        }
        Ok(state.insert_role(code))
    }

    async fn upsert_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut state = self.available_state()?;

        if let Some(category) = state.categories.iter().find(|c| c.category_name == name) {
            return Ok(category.clone());
        }
        Ok(state.insert_category(name))
    }

    async fn most_popular(&self, limit: usize) -> Result<Vec<PopularPost>, StoreError> {
        let state = self.available_state()?;

        let mut published: Vec<&Post> = state.posts.iter().filter(|p| p.is_published()).collect();
        published.sort_by_key(|p| (Reverse(p.views_count.unwrap_or(-1)), p.id));

        let popular = published
            .into_iter()
            .take(limit)
            .filter_map(|post| {
                let publication_date = post.publication_date?;
                let author_name = post
                    .user_id
                    .and_then(|uid| state.users.iter().find(|u| u.id == uid))
                    .map(|u| u.name.clone());
                let category_name = state
                    .category_post
                    .iter()
                    .filter(|(pid, _)| *pid == post.id)
                    .map(|(_, cid)| *cid)
                    .min()
                    .and_then(|cid| state.categories.iter().find(|c| c.id == cid))
                    .map(|c| c.category_name.clone());

                Some(PopularPost {
                    id: post.id,
                    title: post.title.clone(),
                    author_name,
                    category_name,
                    publication_date,
                    views_count: post.views_count,
                })
            })
            .collect();

        Ok(popular)
    }

    async fn clear_seeded(&self) -> Result<(), StoreError> {
        let mut state = self.available_state()?;

        state.category_post.clear();
        state.posts.clear();
        state.role_user.clear();
        state.users.clear();

        Ok(())
    }
}

//! Post seeding: create posts, link categories, promote one featured post.

use std::fmt;

use rand::Rng;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use blog::BlogStore;
use blog::models::PostChanges;

use super::error::{SeedError, StoreResultExt};
use crate::config::DEFAULT_BATCH_SIZE;
use crate::generators::PostGenerator;

const SEEDER: &str = "PostSeeder";

/// Result of the featured-post promotion at the end of a post seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeaturedOutcome {
    /// This post is now the featured post.
    Marked(i64),
    /// No post had a publication date, so nothing was featured.
    NoEligiblePost,
}

impl FeaturedOutcome {
    pub fn post_id(&self) -> Option<i64> {
        match self {
            FeaturedOutcome::Marked(id) => Some(*id),
            FeaturedOutcome::NoEligiblePost => None,
        }
    }
}

impl fmt::Display for FeaturedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeaturedOutcome::Marked(id) => write!(f, "Marked post ID: {id} as featured."),
            FeaturedOutcome::NoEligiblePost => write!(
                f,
                "No posts found to mark as featured. Please ensure posts are created first."
            ),
        }
    }
}

/// Outcome of a post seeding run.
#[derive(Debug, Clone)]
pub struct PostSeedReport {
    /// Created post ids, in creation order.
    pub post_ids: Vec<i64>,
    /// How many of the created posts have a publication date.
    pub published: usize,
    /// Total post/category links created.
    pub category_links: usize,
    pub featured: FeaturedOutcome,
}

/// Creates posts for existing users and categories.
pub struct PostSeeder<'a, S: BlogStore + ?Sized> {
    store: &'a S,
    generator: PostGenerator,
    progress_interval: usize,
}

impl<'a, S: BlogStore + ?Sized> PostSeeder<'a, S> {
    pub fn new(store: &'a S, generator: PostGenerator) -> Self {
        Self {
            store,
            generator,
            progress_interval: DEFAULT_BATCH_SIZE,
        }
    }

    /// Logs progress every `interval` posts.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Creates `count` posts and then promotes one published post to featured.
    ///
    /// Users and categories are read once up front. `count == 0` is a normal
    /// run that ends with [`FeaturedOutcome::NoEligiblePost`].
    pub async fn run(&self, count: usize, rng: &mut impl Rng) -> Result<PostSeedReport, SeedError> {
        let user_ids: Vec<i64> = self
            .store
            .all_users()
            .await
            .during(SEEDER, "loading users")?
            .iter()
            .map(|u| u.id)
            .collect();
        let category_ids: Vec<i64> = self
            .store
            .all_categories()
            .await
            .during(SEEDER, "loading categories")?
            .iter()
            .map(|c| c.id)
            .collect();

        if user_ids.is_empty() {
            warn!("No users found, posts will have no author");
        }
        if category_ids.is_empty() {
            warn!("No categories found, posts will have no categories");
        }

        info!("Seeding {} posts...", count);

        let now = OffsetDateTime::now_utc();
        let mut post_ids = Vec::with_capacity(count);
        let mut published = 0;
        let mut category_links = 0;

        for i in 0..count {
            let candidate = self.generator.generate(&user_ids, now, rng);
            let post = self
                .store
                .create_post(&candidate)
                .await
                .during(SEEDER, "creating posts")?;

            let categories = self.generator.pick_categories(&category_ids, rng);
            self.store
                .attach_categories(post.id, &categories)
                .await
                .during(SEEDER, "attaching categories")?;

            if post.is_published() {
                published += 1;
            }
            category_links += categories.len();
            post_ids.push(post.id);

            if (i + 1) % self.progress_interval == 0 {
                info!("  Seeded {}/{} posts", i + 1, count);
            }
        }

        info!(
            "Seeded {} posts ({} published, {} category links)",
            post_ids.len(),
            published,
            category_links
        );

        let featured = self.promote_featured().await?;

        Ok(PostSeedReport {
            post_ids,
            published,
            category_links,
            featured,
        })
    }

    /// Makes one random published post the only featured post.
    pub async fn promote_featured(&self) -> Result<FeaturedOutcome, SeedError> {
        let cleared = self
            .store
            .clear_featured_posts()
            .await
            .during(SEEDER, "clearing featured posts")?;
        if cleared > 0 {
            debug!("Unfeatured {} posts from earlier runs", cleared);
        }

        let Some(post) = self
            .store
            .random_published_post()
            .await
            .during(SEEDER, "picking a featured post")?
        else {
            warn!("No published posts, nothing to feature");
            return Ok(FeaturedOutcome::NoEligiblePost);
        };

        self.store
            .update_post(post.id, PostChanges::featured())
            .await
            .during(SEEDER, "marking the featured post")?;

        info!(post_id = post.id, "Featured post selected");
        Ok(FeaturedOutcome::Marked(post.id))
    }
}

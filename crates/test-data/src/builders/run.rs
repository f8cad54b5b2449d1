//! Fluent builder for a complete seeding run.

use std::time::Instant;

use rand::Rng;
use tracing::info;

use blog::BlogStore;

use crate::config::{DEFAULT_BATCH_SIZE, SeedConfig};
use crate::db::{
    DEFAULT_CATEGORIES, PostSeedReport, PostSeeder, ReferenceData, SeedError, UserSeedReport,
    UserSeeder, seed_reference_data,
};
use crate::generators::{PostGenConfig, PostGenerator, UserGenConfig, UserGenerator};

/// Result of a seeding run.
#[derive(Debug)]
pub struct SeedSummary {
    /// Present when reference data seeding was enabled.
    pub reference: Option<ReferenceData>,
    pub users: UserSeedReport,
    pub posts: PostSeedReport,
    /// Metrics from the run (populated if metrics tracking enabled).
    pub metrics: Option<SeedMetrics>,
}

/// Timing and count metrics from a seeding run.
#[derive(Debug, Clone)]
pub struct SeedMetrics {
    /// Time spent seeding users and roles (milliseconds).
    pub user_time_ms: u64,
    /// Time spent seeding posts and categories (milliseconds).
    pub post_time_ms: u64,
    pub user_count: usize,
    pub post_count: usize,
    pub published_count: usize,
    pub role_links: usize,
    pub category_links: usize,
}

/// Builder for seeding runs.
///
/// # Example
///
/// ```rust,ignore
/// let summary = SeedRun::new()
///     .with_users(10)
///     .with_posts(50)
///     .with_reference_data(true)
///     .run(&store, &mut rng)
///     .await?;
/// println!("{}", summary.posts.featured);
/// ```
pub struct SeedRun {
    user_count: usize,
    user_config: UserGenConfig,

    post_count: usize,
    post_config: PostGenConfig,

    reference_data: bool,
    category_names: Vec<String>,
    fresh: bool,

    batch_size: usize,
    track_metrics: bool,
}

impl Default for SeedRun {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedRun {
    /// Creates a run with default settings.
    pub fn new() -> Self {
        Self {
            user_count: 10,
            user_config: UserGenConfig::default(),
            post_count: 50,
            post_config: PostGenConfig::default(),
            reference_data: false,
            category_names: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            fresh: false,
            batch_size: DEFAULT_BATCH_SIZE,
            track_metrics: false,
        }
    }

    /// Creates a run from environment-derived configuration.
    pub fn from_config(config: &SeedConfig) -> Self {
        Self::new()
            .with_users(config.user_count)
            .with_posts(config.post_count)
            .with_batch_size(config.batch_size)
            .with_reference_data(config.reference_data)
            .with_fresh(config.fresh)
    }

    /// Sets the number of users to create.
    pub fn with_users(mut self, count: usize) -> Self {
        self.user_count = count;
        self
    }

    /// Sets the user generation configuration.
    pub fn with_user_config(mut self, config: UserGenConfig) -> Self {
        self.user_config = config;
        self
    }

    /// Sets the number of posts to create.
    pub fn with_posts(mut self, count: usize) -> Self {
        self.post_count = count;
        self
    }

    /// Sets the post generation configuration.
    pub fn with_post_config(mut self, config: PostGenConfig) -> Self {
        self.post_config = config;
        self
    }

    /// Upserts roles and categories before seeding.
    pub fn with_reference_data(mut self, enabled: bool) -> Self {
        self.reference_data = enabled;
        self
    }

    /// Replaces the category names used by reference data seeding.
    pub fn with_categories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Deletes existing users and posts before seeding.
    pub fn with_fresh(mut self, enabled: bool) -> Self {
        self.fresh = enabled;
        self
    }

    /// Sets the user insert batch size, also used as the post progress-log interval.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Enables timing metrics in the summary.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Runs reference data, users and posts, in that order.
    ///
    /// Nothing is rolled back on failure: records written before the error stay.
    pub async fn run<S: BlogStore + ?Sized>(
        self,
        store: &S,
        rng: &mut impl Rng,
    ) -> Result<SeedSummary, SeedError> {
        // Validate generator settings before touching the store
        let post_generator = PostGenerator::with_config(self.post_config.clone())?;

        if self.fresh {
            store.clear_seeded().await.map_err(|source| SeedError::Store {
                seeder: "SeedRun",
                step: "clearing seeded data",
                source,
            })?;
        }

        let reference = if self.reference_data {
            let names: Vec<&str> = self.category_names.iter().map(String::as_str).collect();
            Some(seed_reference_data(store, &names).await?)
        } else {
            None
        };

        let user_start = Instant::now();
        let users = UserSeeder::new(store)
            .with_generator(UserGenerator::with_config(self.user_config.clone()))
            .with_batch_size(self.batch_size)
            .run(self.user_count, rng)
            .await?;
        let user_time = user_start.elapsed();

        let post_start = Instant::now();
        let posts = PostSeeder::new(store, post_generator)
            .with_progress_interval(self.batch_size)
            .run(self.post_count, rng)
            .await?;
        let post_time = post_start.elapsed();

        info!(
            "Seed run complete: {} users, {} posts",
            users.user_ids.len(),
            posts.post_ids.len()
        );

        let metrics = self.track_metrics.then(|| SeedMetrics {
            user_time_ms: user_time.as_millis() as u64,
            post_time_ms: post_time.as_millis() as u64,
            user_count: users.user_ids.len(),
            post_count: posts.post_ids.len(),
            published_count: posts.published,
            role_links: users.role_links,
            category_links: posts.category_links,
        });

        Ok(SeedSummary {
            reference,
            users,
            posts,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = SeedConfig::new(3, 7);
        config.batch_size = 0;
        config.reference_data = true;

        let run = SeedRun::from_config(&config);
        assert_eq!(run.user_count, 3);
        assert_eq!(run.post_count, 7);
        assert_eq!(run.batch_size, 1);
        assert!(run.reference_data);
        assert!(!run.fresh);
        assert_eq!(run.category_names.len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn test_with_categories() {
        let run = SeedRun::new().with_categories(["News", "Opinion"]);
        assert_eq!(run.category_names, vec!["News", "Opinion"]);
    }
}

//! Seed data generation for the blog.
//!
//! This crate fills a blog store with fake users, role assignments, posts,
//! post categories and a single featured post, to support manual
//! verification and integration testing.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let store = MemoryStore::new()
//!     .with_roles(&RoleCode::ALL)
//!     .with_categories(DEFAULT_CATEGORIES.iter().copied());
//!
//! let summary = SeedRun::new()
//!     .with_users(10)
//!     .with_posts(50)
//!     .run(&store, &mut rng)
//!     .await?;
//! println!("{}", summary.posts.featured);
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod generators;
pub mod sampling;

pub use db::SeedError;

// Re-export core types from the blog crate
pub use blog::models::{NewPost, NewUser, PostStatus, RoleCode};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{SeedMetrics, SeedRun, SeedSummary};
    pub use crate::config::SeedConfig;
    pub use crate::db::{
        DEFAULT_CATEGORIES, FeaturedOutcome, PostSeedReport, PostSeeder, SeedError,
        UserSeedReport, UserSeeder, seed_reference_data,
    };
    pub use crate::generators::{PostGenConfig, PostGenerator, UserGenConfig, UserGenerator};
    pub use crate::sampling::Coin;
    pub use crate::{NewPost, NewUser, PostStatus, RoleCode};
    pub use blog::{BlogStore, Database, MemoryStore};
}

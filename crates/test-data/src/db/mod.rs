//! Seeding routines that write generated data through a [`blog::BlogStore`].
//!
//! [`UserSeeder`] must run before [`PostSeeder`]: posts read the user set
//! once at start to pick their authors.

mod error;
mod posts;
mod reference;
mod users;

pub use error::SeedError;
pub use posts::{FeaturedOutcome, PostSeedReport, PostSeeder};
pub use reference::{DEFAULT_CATEGORIES, ReferenceData, seed_reference_data};
pub use users::{UserSeedReport, UserSeeder};

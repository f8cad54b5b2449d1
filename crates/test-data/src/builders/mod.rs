//! Fluent builder APIs for seeding runs.
//!
//! The [`SeedRun`] provides a convenient way to run reference data, user
//! and post seeding in order against any [`blog::BlogStore`].

mod run;

pub use run::{SeedMetrics, SeedRun, SeedSummary};

//! Default seed script - fills the blog database with fake users and posts
//!
//! Run with:
//! ```
//! MAX_USER_SEED=10 MAX_POST_SEED=50 cargo run -p test-data --bin seed
//! ```

use blog::{BlogStore, Database};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::postgres::PgPoolOptions;
use test_data::builders::SeedRun;
use test_data::config::SeedConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SeedConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    let db = Database::new(pool);

    let mut rng = match config.rng_seed {
        Some(seed) => {
            tracing::info!("Using RNG seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let summary = SeedRun::from_config(&config)
        .with_metrics(true)
        .run(&db, &mut rng)
        .await?;

    println!("{}", summary.posts.featured);

    // Summary output
    tracing::info!("Seed completed!");
    if let Some(reference) = &summary.reference {
        tracing::info!("  Roles: {}", reference.roles.len());
        tracing::info!("  Categories: {}", reference.categories.len());
    }
    tracing::info!("  Users: {}", summary.users.user_ids.len());
    tracing::info!("  Role links: {}", summary.users.role_links);
    tracing::info!("  Posts: {}", summary.posts.post_ids.len());
    tracing::info!("  Published: {}", summary.posts.published);
    tracing::info!("  Category links: {}", summary.posts.category_links);
    if let Some(metrics) = &summary.metrics {
        tracing::info!(
            "  Time: {}ms users, {}ms posts",
            metrics.user_time_ms,
            metrics.post_time_ms
        );
    }

    for post in db.most_popular(5).await? {
        tracing::info!(
            "  {} views: {} by {}",
            post.views_count.unwrap_or(0),
            post.title,
            post.author_name.as_deref().unwrap_or("unknown")
        );
    }

    Ok(())
}

//! Reference data: the fixed role set and a default category list.

use tracing::info;

use blog::BlogStore;
use blog::models::{Category, Role, RoleCode};

use super::error::{SeedError, StoreResultExt};

const SEEDER: &str = "ReferenceSeeder";

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Technology",
    "Travel",
    "Food",
    "Lifestyle",
    "Health",
    "Business",
    "Science",
    "Culture",
];

/// Roles and categories present after reference seeding.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub roles: Vec<Role>,
    pub categories: Vec<Category>,
}

/// Ensures every role and the given categories exist. Safe to run repeatedly.
pub async fn seed_reference_data<S: BlogStore + ?Sized>(
    store: &S,
    category_names: &[&str],
) -> Result<ReferenceData, SeedError> {
    info!(
        "Ensuring {} roles and {} categories...",
        RoleCode::ALL.len(),
        category_names.len()
    );

    let mut roles = Vec::with_capacity(RoleCode::ALL.len());
    for code in RoleCode::ALL {
        roles.push(
            store
                .upsert_role(code)
                .await
                .during(SEEDER, "upserting roles")?,
        );
    }

    let mut categories = Vec::with_capacity(category_names.len());
    for name in category_names {
        categories.push(
            store
                .upsert_category(name)
                .await
                .during(SEEDER, "upserting categories")?,
        );
    }

    info!("Reference data ready");
    Ok(ReferenceData { roles, categories })
}

//! User seeding: create users, then link roles.

use rand::Rng;
use tracing::{debug, info};

use blog::BlogStore;
use blog::models::RoleCode;

use super::error::{SeedError, StoreResultExt};
use crate::config::DEFAULT_BATCH_SIZE;
use crate::generators::{RoleSet, UserGenerator};

const SEEDER: &str = "UserSeeder";

/// Outcome of a user seeding run.
#[derive(Debug, Clone)]
pub struct UserSeedReport {
    /// Created user ids, in creation order.
    pub user_ids: Vec<i64>,
    /// The user holding every role.
    pub admin_id: i64,
    /// Total user/role links created.
    pub role_links: usize,
}

/// Creates users and assigns them roles.
pub struct UserSeeder<'a, S: BlogStore + ?Sized> {
    store: &'a S,
    generator: UserGenerator,
    batch_size: usize,
}

impl<'a, S: BlogStore + ?Sized> UserSeeder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            generator: UserGenerator::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_generator(mut self, generator: UserGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Sets the batch size for bulk user creation.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Creates `count` users, makes one of them admin and gives the rest member roles.
    ///
    /// Fails before writing anything if a role is missing or `count` is zero.
    pub async fn run(&self, count: usize, rng: &mut impl Rng) -> Result<UserSeedReport, SeedError> {
        let roles = self.resolve_roles().await?;

        if count == 0 {
            return Err(SeedError::EmptyCollection {
                seeder: SEEDER,
                what: "an admin user",
            });
        }

        info!("Seeding {} users...", count);

        let new_users = self.generator.generate_batch(count, rng);
        let mut user_ids = Vec::with_capacity(count);
        for chunk in new_users.chunks(self.batch_size) {
            let created = self
                .store
                .create_users(chunk)
                .await
                .during(SEEDER, "creating users")?;
            user_ids.extend(created.iter().map(|u| u.id));
            debug!("  Created {}/{} users", user_ids.len(), count);
        }

        let plan = roles.plan(&user_ids, rng).ok_or(SeedError::EmptyCollection {
            seeder: SEEDER,
            what: "an admin user",
        })?;

        for assignment in &plan.assignments {
            self.store
                .attach_roles(assignment.user_id, &assignment.role_ids)
                .await
                .during(SEEDER, "attaching roles")?;
        }

        info!(
            admin_id = plan.admin_id,
            "Seeded {} users with {} role links",
            user_ids.len(),
            plan.link_count()
        );

        Ok(UserSeedReport {
            role_links: plan.link_count(),
            admin_id: plan.admin_id,
            user_ids,
        })
    }

    /// Looks up the admin, contributor and subscriber role ids.
    async fn resolve_roles(&self) -> Result<RoleSet, SeedError> {
        Ok(RoleSet {
            admin: self.role_id(RoleCode::Admin).await?,
            contributor: self.role_id(RoleCode::Contributor).await?,
            subscriber: self.role_id(RoleCode::Subscriber).await?,
        })
    }

    async fn role_id(&self, code: RoleCode) -> Result<i64, SeedError> {
        self.store
            .find_role(code)
            .await
            .during(SEEDER, "looking up roles")?
            .map(|role| role.id)
            .ok_or(SeedError::MissingRole { code })
    }
}

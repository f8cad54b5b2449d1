//! Role assignment planning.
//!
//! One user, picked at random, gets every role. Everyone else gets one or
//! both of contributor and subscriber, never zero.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::sampling::pick_one;

/// Store ids of the three roles, resolved before planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet {
    pub admin: i64,
    pub contributor: i64,
    pub subscriber: i64,
}

/// Roles to attach to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub user_id: i64,
    pub role_ids: Vec<i64>,
}

/// Role assignments for a whole batch of users, in user order.
#[derive(Debug, Clone)]
pub struct RolePlan {
    pub admin_id: i64,
    pub assignments: Vec<RoleAssignment>,
}

impl RolePlan {
    /// Total number of user/role links the plan creates.
    pub fn link_count(&self) -> usize {
        self.assignments.iter().map(|a| a.role_ids.len()).sum()
    }
}

impl RoleSet {
    pub fn all(&self) -> Vec<i64> {
        vec![self.admin, self.contributor, self.subscriber]
    }

    /// Plans role links for `user_ids`. Returns `None` when there is no user to make admin.
    pub fn plan(&self, user_ids: &[i64], rng: &mut impl Rng) -> Option<RolePlan> {
        let admin_id = *pick_one(user_ids, rng)?;

        let assignments = user_ids
            .iter()
            .map(|&user_id| {
                let role_ids = if user_id == admin_id {
                    self.all()
                } else {
                    self.member_roles(rng)
                };
                RoleAssignment { user_id, role_ids }
            })
            .collect();

        Some(RolePlan {
            admin_id,
            assignments,
        })
    }

    /// A shuffled prefix of {contributor, subscriber} of length 1 or 2.
    fn member_roles(&self, rng: &mut impl Rng) -> Vec<i64> {
        let mut pool = vec![self.contributor, self.subscriber];
        pool.shuffle(rng);
        pool.truncate(rng.gen_range(1..=2));
        pool
    }
}

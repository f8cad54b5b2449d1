//! Entity generators for seed data.
//!
//! This module provides generators for creating blog seed entities:
//! - [`UserGenerator`]: Generate users with unique emails
//! - [`RoleSet`]: Plan role links, one admin and members with one or two roles
//! - [`PostGenerator`]: Generate posts with authors, publication state and categories

pub mod post;
pub mod role;
pub mod user;

pub use post::{PostGenConfig, PostGenerator};
pub use role::{RoleAssignment, RolePlan, RoleSet};
pub use user::{UserGenConfig, UserGenerator};

//! Blog domain models and data store.
//!
//! The entities are users, roles, categories and posts, with many-to-many
//! links User↔Role (`role_user`) and Post↔Category (`category_post`).
//! [`store::BlogStore`] is the seam everything else talks to.

pub mod database;
pub mod errors;
pub mod memory;
pub mod models;
pub mod store;

pub use database::Database;
pub use errors::StoreError;
pub use memory::MemoryStore;
pub use store::BlogStore;

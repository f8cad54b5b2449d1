use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{relation} already links {owner_id} to {target_id}")]
    Duplicate {
        relation: &'static str,
        owner_id: i64,
        target_id: i64,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Store unavailable")]
    Unavailable,
}

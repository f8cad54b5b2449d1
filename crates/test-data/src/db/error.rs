use blog::StoreError;
use blog::models::RoleCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("{name} is not set")]
    MissingSetting { name: &'static str },

    #[error("{name} has an invalid value: {value:?}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("Probability must be within 0.0..=1.0, got {0}")]
    InvalidProbability(f64),

    #[error("Role {code} does not exist; seed reference data first")]
    MissingRole { code: RoleCode },

    #[error("{seeder}: cannot pick {what} from an empty collection")]
    EmptyCollection {
        seeder: &'static str,
        what: &'static str,
    },

    #[error("{seeder}: store error while {step}: {source}")]
    Store {
        seeder: &'static str,
        step: &'static str,
        #[source]
        source: StoreError,
    },
}

impl SeedError {
    /// True for errors fixed by changing settings or reference data rather than retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SeedError::MissingSetting { .. }
                | SeedError::InvalidSetting { .. }
                | SeedError::InvalidProbability(_)
                | SeedError::MissingRole { .. }
        )
    }
}

/// Attaches seeder and step context to store results.
pub(crate) trait StoreResultExt<T> {
    fn during(self, seeder: &'static str, step: &'static str) -> Result<T, SeedError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn during(self, seeder: &'static str, step: &'static str) -> Result<T, SeedError> {
        self.map_err(|source| SeedError::Store {
            seeder,
            step,
            source,
        })
    }
}

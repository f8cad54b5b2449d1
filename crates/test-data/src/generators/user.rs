//! User generation.

use fake::{Fake, faker::name::en::Name};
use rand::Rng;

use blog::models::NewUser;

/// Bcrypt hash of the string "password", so seeded accounts can sign in locally.
pub const DEFAULT_PASSWORD_HASH: &str =
    "$2y$10$92IXUNpkjO0rOQ5byMi.Ye4oKoEa3Ro9llC/.og/at2.uheWG/igi";

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// Domains used for generated email addresses.
    pub email_domains: Vec<String>,
    /// Password hash stored for every generated user.
    pub password_hash: String,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            email_domains: vec![
                "example.com".to_string(),
                "example.org".to_string(),
                "example.net".to_string(),
            ],
            password_hash: DEFAULT_PASSWORD_HASH.to_string(),
        }
    }
}

/// Generates user data for seeding.
pub struct UserGenerator {
    config: UserGenConfig,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: UserGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single user.
    pub fn generate(&self, rng: &mut impl Rng) -> NewUser {
        let name: String = Name().fake_with_rng(rng);
        let email = self.generate_email(&name, rng);

        NewUser {
            name,
            email,
            password: self.config.password_hash.clone(),
        }
    }

    /// Generates multiple users.
    pub fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<NewUser> {
        (0..count).map(|_| self.generate(rng)).collect()
    }

    /// Generates an email from a name.
    fn generate_email(&self, name: &str, rng: &mut impl Rng) -> String {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");

        // Wide suffix keeps emails unique across a few thousand users
        let suffix: u32 = rng.r#gen();
        let domain = match self.config.email_domains.as_slice() {
            [] => "example.com",
            domains => domains[rng.gen_range(0..domains.len())].as_str(),
        };

        format!("{normalized}.{suffix:08x}@{domain}")
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_user() {
        let user_gen = UserGenerator::new();
        let mut rng = rand::thread_rng();
        let user = user_gen.generate(&mut rng);

        assert!(!user.name.is_empty());
        assert!(user.email.contains('@'));
        assert_eq!(user.password, DEFAULT_PASSWORD_HASH);
    }

    #[test]
    fn test_generate_batch() {
        let user_gen = UserGenerator::new();
        let mut rng = rand::thread_rng();
        let users = user_gen.generate_batch(10, &mut rng);

        assert_eq!(users.len(), 10);

        // Emails should be unique
        let emails: std::collections::HashSet<_> = users.iter().map(|u| &u.email).collect();
        assert_eq!(emails.len(), 10);
    }

    #[test]
    fn test_custom_domain() {
        let user_gen = UserGenerator::with_config(UserGenConfig {
            email_domains: vec!["blog.test".to_string()],
            ..Default::default()
        });
        let mut rng = rand::thread_rng();

        let user = user_gen.generate(&mut rng);
        assert!(user.email.ends_with("@blog.test"));
    }
}

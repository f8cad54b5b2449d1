use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: OffsetDateTime,
}

/// User data ready for insertion; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The fixed role set, stored in `roles.role_name` as a one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleCode {
    Admin,
    Contributor,
    Subscriber,
}

impl RoleCode {
    pub const ALL: [RoleCode; 3] = [RoleCode::Admin, RoleCode::Contributor, RoleCode::Subscriber];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCode::Admin => "A",
            RoleCode::Contributor => "C",
            RoleCode::Subscriber => "S",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoleCode::Admin => "admin",
            RoleCode::Contributor => "contributor",
            RoleCode::Subscriber => "subscriber",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == code)
    }
}

impl fmt::Display for RoleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i64,
    pub role_name: String,
}

impl Role {
    pub fn code(&self) -> Option<RoleCode> {
        RoleCode::from_code(&self.role_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub category_name: String,
}

/// Editorial status of a post, stored in `posts.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    Draft,
    Published,
    Inactive,
}

impl PostStatus {
    pub const ALL: [PostStatus; 3] = [PostStatus::Draft, PostStatus::Published, PostStatus::Inactive];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "D",
            PostStatus::Published => "P",
            PostStatus::Inactive => "I",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub status: String,
    pub featured_image_url: Option<String>,
    pub publication_date: Option<OffsetDateTime>,
    pub views_count: Option<i32>,
    pub featured_post: bool,
    pub created_at: OffsetDateTime,
}

impl Post {
    /// A post is published once it has a publication date; drafts have none.
    pub fn is_published(&self) -> bool {
        self.publication_date.is_some()
    }

    pub fn status(&self) -> Option<PostStatus> {
        PostStatus::from_code(&self.status)
    }
}

/// Post data ready for insertion; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub status: PostStatus,
    pub featured_image_url: Option<String>,
    pub publication_date: Option<OffsetDateTime>,
    pub views_count: Option<i32>,
}

/// Partial update applied to a stored post. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub featured_post: Option<bool>,
}

impl PostChanges {
    pub fn featured() -> Self {
        Self {
            featured_post: Some(true),
        }
    }
}

/// A published post with the names shown next to it in "most popular" lists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PopularPost {
    pub id: i64,
    pub title: String,
    pub author_name: Option<String>,
    pub category_name: Option<String>,
    pub publication_date: OffsetDateTime,
    pub views_count: Option<i32>,
}

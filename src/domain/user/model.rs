use chrono::{DateTime, Utc};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    /// Festival-goer; may only use public endpoints
    #[default]
    Public,
    /// Manages the catalog and booking parameters
    Organizer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Organizer => "organizer",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "organizer" => Self::Organizer,
            _ => Self::Public,
        }
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: i32,
    /// Normalized email, unique
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert a user; the password is already hashed.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

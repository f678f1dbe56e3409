//! User domain types.
//!
//! These types represent validated domain objects separate from database row
//! types.

use chrono::{DateTime, Utc};

use minimart_core::{UserId, Username, wire::UserSummary};

/// A directory user (domain type).
///
/// The password hash and API key are deliberately not part of this type;
/// the repository exposes them only through dedicated lookups.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique account name.
    pub username: Username,
    /// Contact email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Wire-format snapshot of this user.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Fields required to create a user.
#[derive(Debug)]
pub struct NewUser {
    pub username: Username,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

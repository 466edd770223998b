//! Driving port for user directory mutations.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId, UserProfile};

/// Domain use-case port for registering, editing and removing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a user. Duplicate emails surface as `conflict`.
    async fn create_user(&self, profile: UserProfile) -> Result<User, Error>;

    /// Replace a user's profile. Missing users surface as `not_found`.
    async fn update_user(&self, id: &UserId, profile: UserProfile) -> Result<User, Error>;

    /// Remove a user. Missing users surface as `not_found`.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}

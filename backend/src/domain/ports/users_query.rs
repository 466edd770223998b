//! Driving port for user directory reads.

use async_trait::async_trait;

use crate::domain::{Email, Error, User, UserId};

use super::UserFilter;

/// Domain use-case port for looking users up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch one user. Missing users surface as `not_found`.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// Fetch one user by email. Missing users surface as `not_found`.
    async fn get_user_by_email(&self, email: &Email) -> Result<User, Error>;

    /// List users selected by `filter`.
    async fn find_users(&self, filter: &UserFilter) -> Result<Vec<User>, Error>;
}

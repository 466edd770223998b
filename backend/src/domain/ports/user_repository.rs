//! Driven port for the user directory store.

use async_trait::async_trait;

use crate::domain::{BloodGroup, Email, User, UserId, UserRole};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already owns the email address.
        DuplicateEmail { email: String } => "email already exists: {email}",
    }
}

/// Predicate used to select users from the directory.
///
/// Only available users are returned by the role-based filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// Every user, in registration order.
    All,
    /// Available users with exactly this blood group and role.
    AvailableByBloodGroup {
        blood_group: BloodGroup,
        role: UserRole,
    },
    /// Available users of this role whose location contains the needle,
    /// ignoring case.
    AvailableByLocation { location: String, role: UserRole },
}

impl UserFilter {
    /// Evaluate the filter against one user.
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::AvailableByBloodGroup { blood_group, role } => {
                user.is_available() && user.role() == *role && user.blood_group() == blood_group
            }
            Self::AvailableByLocation { location, role } => {
                user.is_available()
                    && user.role() == *role
                    && user.location().contains_ignore_case(location)
            }
        }
    }
}

/// Port for storing and reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. Fails with `DuplicateEmail` when the email is taken.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Overwrite an existing user. Fails with `DuplicateEmail` when the new
    /// email belongs to someone else.
    async fn update(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Remove a user, returning whether a record was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch all users selected by `filter`.
    async fn find(&self, filter: &UserFilter) -> Result<Vec<User>, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise user persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn update(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &Email) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find(&self, _filter: &UserFilter) -> Result<Vec<User>, UserRepositoryError> {
        Ok(Vec::new())
    }
}

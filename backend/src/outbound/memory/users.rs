//! In-memory user directory.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserFilter, UserRepository, UserRepositoryError};
use crate::domain::{Email, User, UserId};

use super::lock;

/// User directory held in process memory. Emails are unique.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, UserRepositoryError> {
        lock(&self.users, UserRepositoryError::query)
    }

    /// Snapshot of one stored user, used by the match store to join
    /// locations.
    pub(crate) fn snapshot(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.guard()?.iter().find(|user| user.id() == id).cloned())
    }
}

fn email_taken(users: &[User], candidate: &User) -> bool {
    users
        .iter()
        .any(|user| user.id() != candidate.id() && user.email() == candidate.email())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.guard()?;
        if email_taken(&users, user) {
            return Err(UserRepositoryError::duplicate_email(user.email().as_str()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.guard()?;
        if email_taken(&users, user) {
            return Err(UserRepositoryError::duplicate_email(user.email().as_str()));
        }
        match users.iter_mut().find(|stored| stored.id() == user.id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserRepositoryError::query(format!(
                "user {} does not exist",
                user.id()
            ))),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut users = self.guard()?;
        let before = users.len();
        users.retain(|user| user.id() != id);
        Ok(users.len() != before)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        self.snapshot(id)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .guard()?
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find(&self, filter: &UserFilter) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self
            .guard()?
            .iter()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect())
    }
}

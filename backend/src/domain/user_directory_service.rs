//! User directory service.
//!
//! Implements the users command and query ports over a [`UserRepository`],
//! enforcing email uniqueness on registration and on email changes.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::matching::map_user_repository_error;
use crate::domain::ports::{UserFilter, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Email, Error, User, UserId, UserProfile};

/// Registers, edits and looks up donors and seekers.
pub struct UserDirectoryService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> Clone for UserDirectoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R> UserDirectoryService<R> {
    /// Create a new service over `repo`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> UserDirectoryService<R>
where
    R: UserRepository,
{
    fn not_found(id: &UserId) -> Error {
        Error::not_found("User not found").with_details(json!({ "id": id.to_string() }))
    }

    fn duplicate_email(email: &Email) -> Error {
        Error::conflict("Email already exists").with_details(json!({
            "field": "email",
            "value": email.as_str(),
            "code": "duplicate_email",
        }))
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn ensure_email_free(&self, email: &Email, owner: Option<&UserId>) -> Result<(), Error> {
        let holder = self
            .repo
            .find_by_email(email)
            .await
            .map_err(map_user_repository_error)?;
        match holder {
            Some(existing) if Some(existing.id()) != owner => Err(Self::duplicate_email(email)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> UsersCommand for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, profile: UserProfile) -> Result<User, Error> {
        self.ensure_email_free(&profile.email, None).await?;
        let user = User::register(UserId::random(), profile, self.clock.utc());
        self.repo
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, profile: UserProfile) -> Result<User, Error> {
        let existing = self.load(id).await?;
        if existing.email() != &profile.email {
            self.ensure_email_free(&profile.email, Some(id)).await?;
        }
        let updated = existing.with_profile(profile, self.clock.utc());
        self.repo
            .update(&updated)
            .await
            .map_err(map_user_repository_error)?;
        Ok(updated)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(map_user_repository_error)?;
        if removed {
            info!(user_id = %id, "user deleted");
            Ok(())
        } else {
            Err(Self::not_found(id))
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.load(id).await
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<User, Error> {
        self.repo
            .find_by_email(email)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| {
                Error::not_found("User not found").with_details(json!({ "email": email.as_str() }))
            })
    }

    async fn find_users(&self, filter: &UserFilter) -> Result<Vec<User>, Error> {
        self.repo
            .find(filter)
            .await
            .map_err(map_user_repository_error)
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;

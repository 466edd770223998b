//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserFilter, UserRepository, UserRepositoryError};
use crate::domain::{
    Age, BloodGroup, Email, Location, PersonName, User, UserId, UserProfile, UserRole, Weight,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_helpers::{contains_pattern, corrupt_row};
use super::models::{UserRecord, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of the user directory.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &'static str,
    email: &str,
) -> UserRepositoryError {
    if is_unique_violation(&error) {
        return UserRepositoryError::duplicate_email(email);
    }
    map_basic_diesel_error(
        error,
        operation,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn map_read_error(error: diesel::result::Error, operation: &'static str) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        operation,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn invalid(id: Uuid, column: &str, error: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::query(corrupt_row("users", id, column, error))
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let id = row.id;
    let profile = UserProfile {
        name: PersonName::new(&row.name).map_err(|err| invalid(id, "name", err))?,
        email: Email::new(&row.email).map_err(|err| invalid(id, "email", err))?,
        phone: row.phone,
        blood_group: BloodGroup::new(&row.blood_group)
            .map_err(|err| invalid(id, "blood_group", err))?,
        location: Location::new(&row.location).map_err(|err| invalid(id, "location", err))?,
        age: Age::new(i64::from(row.age)).map_err(|err| invalid(id, "age", err))?,
        weight: row
            .weight
            .map(Weight::new)
            .transpose()
            .map_err(|err| invalid(id, "weight", err))?,
        role: row
            .role
            .parse::<UserRole>()
            .map_err(|err| invalid(id, "role", err))?,
        is_available: row.is_available,
        last_donation: row.last_donation,
        medical_conditions: row.medical_conditions,
        emergency_contact: row.emergency_contact,
    };
    Ok(User::restore(
        UserId::from_uuid(id),
        profile,
        row.created_at,
        row.updated_at,
    ))
}

fn user_record(user: &User) -> UserRecord<'_> {
    let profile = user.profile();
    UserRecord {
        id: *user.id().as_uuid(),
        name: profile.name.as_str(),
        email: profile.email.as_ref(),
        phone: profile.phone.as_deref(),
        blood_group: profile.blood_group.as_ref(),
        location: profile.location.as_ref(),
        age: i16::from(profile.age.years()),
        weight: profile.weight.map(Weight::kilograms),
        role: profile.role.as_str(),
        is_available: profile.is_available,
        last_donation: profile.last_donation,
        medical_conditions: profile.medical_conditions.as_deref(),
        emergency_contact: profile.emergency_contact.as_deref(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

fn collect(rows: Vec<UserRow>) -> Result<Vec<User>, UserRepositoryError> {
    rows.into_iter().map(row_to_user).collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserRepositoryError::connection))?;
        diesel::insert_into(users::table)
            .values(&user_record(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, "insert user", user.email().as_str()))
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserRepositoryError::connection))?;
        let updated = diesel::update(users::table.find(user.id().as_uuid()))
            .set(&user_record(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update user", user.email().as_str()))?;
        if updated == 0 {
            return Err(UserRepositoryError::query(format!(
                "update user: {} does not exist",
                user.id()
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserRepositoryError::connection))?;
        let deleted = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_read_error(err, "delete user"))?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserRepositoryError::connection))?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_read_error(err, "find user"))?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserRepositoryError::connection))?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_read_error(err, "find user by email"))?;
        row.map(row_to_user).transpose()
    }

    async fn find(&self, filter: &UserFilter) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserRepositoryError::connection))?;
        let mut query = users::table
            .select(UserRow::as_select())
            .order((users::created_at.asc(), users::id.asc()))
            .into_boxed();
        match filter {
            UserFilter::All => {}
            UserFilter::AvailableByBloodGroup { blood_group, role } => {
                query = query
                    .filter(users::is_available.eq(true))
                    .filter(users::role.eq(role.as_str()))
                    .filter(users::blood_group.eq(blood_group.as_str()));
            }
            UserFilter::AvailableByLocation { location, role } => {
                query = query
                    .filter(users::is_available.eq(true))
                    .filter(users::role.eq(role.as_str()))
                    .filter(users::location.ilike(contains_pattern(location)));
            }
        }
        let rows = query
            .load::<UserRow>(&mut conn)
            .await
            .map_err(|err| map_read_error(err, "list users"))?;
        collect(rows)
    }
}

//! Tests for the user directory service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockUserRepository, UserRepositoryError};
use crate::domain::test_fixtures::{fixture_clock, profile, timestamp, user};
use crate::domain::UserRole;

fn make_service(repo: MockUserRepository) -> UserDirectoryService<MockUserRepository> {
    UserDirectoryService::new(Arc::new(repo), fixture_clock(60))
}

#[tokio::test]
async fn create_registers_new_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_insert().times(1).return_once(|_| Ok(()));

    let service = make_service(repo);
    let submitted = profile(UserRole::Donor, "A-", "Leeds", true);
    let created = service
        .create_user(submitted.clone())
        .await
        .expect("create succeeds");

    assert_eq!(created.profile(), &submitted);
    assert_eq!(created.created_at(), timestamp(60));
    assert_eq!(created.updated_at(), timestamp(60));
}

#[tokio::test]
async fn create_rejects_taken_email() {
    let existing = user(UserRole::Seeker, "A-", "Leeds", true);
    let mut submitted = profile(UserRole::Donor, "A-", "Leeds", true);
    submitted.email = existing.email().clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_insert().never();

    let error = make_service(repo)
        .create_user(submitted)
        .await
        .expect_err("duplicate email");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Email already exists");
}

#[tokio::test]
async fn create_maps_insert_race_to_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(UserRepositoryError::duplicate_email("a@b.org")));

    let error = make_service(repo)
        .create_user(profile(UserRole::Donor, "B+", "York", true))
        .await
        .expect_err("duplicate email");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn update_keeps_identity_and_creation_time() {
    let existing = user(UserRole::Donor, "AB+", "Leeds", true);
    let id = *existing.id();
    let mut changed = existing.profile().clone();
    changed.is_available = false;
    changed.location = crate::domain::Location::new("Bradford").expect("location");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_find_by_email().never();
    repo.expect_update().times(1).return_once(|_| Ok(()));

    let updated = make_service(repo)
        .update_user(&id, changed)
        .await
        .expect("update succeeds");

    assert_eq!(updated.id(), &id);
    assert!(!updated.is_available());
    assert_eq!(updated.location().as_str(), "Bradford");
    assert_eq!(updated.created_at(), timestamp(0));
    assert_eq!(updated.updated_at(), timestamp(60));
}

#[tokio::test]
async fn update_rejects_email_owned_by_someone_else() {
    let existing = user(UserRole::Donor, "AB+", "Leeds", true);
    let other = user(UserRole::Seeker, "AB+", "Leeds", true);
    let id = *existing.id();
    let mut changed = existing.profile().clone();
    changed.email = other.email().clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(other)));
    repo.expect_update().never();

    let error = make_service(repo)
        .update_user(&id, changed)
        .await
        .expect_err("email clash");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn update_of_missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_update().never();

    let error = make_service(repo)
        .update_user(&UserId::random(), profile(UserRole::Donor, "O-", "Hull", true))
        .await
        .expect_err("missing user");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "User not found");
}

#[rstest]
#[case::removed(true, None)]
#[case::missing(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_users(#[case] removed: bool, #[case] expected: Option<ErrorCode>) {
    let mut repo = MockUserRepository::new();
    repo.expect_delete()
        .times(1)
        .return_once(move |_| Ok(removed));

    let result = make_service(repo).delete_user(&UserId::random()).await;
    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[case::connection(UserRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case::query(UserRepositoryError::query("bad sql"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_are_mapped(
    #[case] failure: UserRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(move |_| Err(failure));

    let error = make_service(repo)
        .find_users(&UserFilter::All)
        .await
        .expect_err("repository failure");
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn lookup_by_email_reports_missing_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(None));

    let email = Email::new("nobody@example.org").expect("email");
    let error = make_service(repo)
        .get_user_by_email(&email)
        .await
        .expect_err("missing user");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

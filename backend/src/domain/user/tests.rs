//! Tests for user value types and entity lifecycle.

use super::*;
use crate::domain::test_fixtures::{profile, timestamp};
use rstest::rstest;

#[rstest]
#[case("A")]
#[case(" B ")]
fn short_names_are_rejected(#[case] raw: &str) {
    assert!(matches!(
        PersonName::new(raw),
        Err(UserValidationError::NameLength { min: 2, max: 100 })
    ));
}

#[rstest]
fn names_longer_than_the_limit_are_rejected() {
    let raw = "x".repeat(NAME_MAX + 1);
    assert!(PersonName::new(raw).is_err());
}

#[rstest]
fn names_are_trimmed() {
    let name = PersonName::new("  Ada Lovelace ").expect("valid name");
    assert_eq!(name.as_ref(), "Ada Lovelace");
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("plainaddress", UserValidationError::InvalidEmail)]
#[case("two@@example.org", UserValidationError::InvalidEmail)]
#[case("missing-tld@example", UserValidationError::InvalidEmail)]
fn malformed_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(raw), Err(expected));
}

#[rstest]
#[case(17, false)]
#[case(18, true)]
#[case(65, true)]
#[case(66, false)]
#[case(-1, false)]
#[case(300, false)]
fn age_bounds_are_inclusive(#[case] years: i64, #[case] accepted: bool) {
    assert_eq!(Age::new(years).is_ok(), accepted);
}

#[rstest]
#[case(44.9, false)]
#[case(45.0, true)]
#[case(f64::NAN, false)]
fn weight_has_a_lower_bound(#[case] kilograms: f64, #[case] accepted: bool) {
    assert_eq!(Weight::new(kilograms).is_ok(), accepted);
}

#[rstest]
#[case("donor", Some(UserRole::Donor))]
#[case("Seeker", Some(UserRole::Seeker))]
#[case("admin", None)]
fn roles_parse_case_insensitively(#[case] raw: &str, #[case] expected: Option<UserRole>) {
    assert_eq!(raw.parse::<UserRole>().ok(), expected);
}

#[rstest]
fn user_ids_reject_padding() {
    assert_eq!(
        UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6"),
        Err(UserValidationError::InvalidId)
    );
}

#[rstest]
fn with_profile_keeps_identity_and_creation_time() {
    let created = timestamp(0);
    let user = User::register(UserId::random(), profile(UserRole::Donor, "O+", "Leeds", true), created);
    let id = *user.id();

    let updated = user.with_profile(profile(UserRole::Donor, "O+", "York", false), timestamp(60));

    assert_eq!(updated.id(), &id);
    assert_eq!(updated.created_at(), created);
    assert_eq!(updated.updated_at(), timestamp(60));
    assert_eq!(updated.location().as_ref(), "York");
    assert!(!updated.is_available());
}

#[rstest]
fn restore_never_reports_updates_before_creation() {
    let user = User::restore(
        UserId::random(),
        profile(UserRole::Seeker, "A-", "Hull", true),
        timestamp(100),
        timestamp(10),
    );
    assert_eq!(user.updated_at(), timestamp(100));
}

#[rstest]
#[case(None, None)]
#[case(Some("   ".to_owned()), None)]
#[case(Some(" asthma ".to_owned()), Some("asthma".to_owned()))]
fn optional_text_is_normalised(#[case] raw: Option<String>, #[case] expected: Option<String>) {
    assert_eq!(normalise_optional_text(raw), expected);
}

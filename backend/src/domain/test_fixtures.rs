//! Builders shared by domain unit tests.

use chrono::{DateTime, TimeZone, Utc};

use super::{
    Age, BloodGroup, CompatibilityScore, Distance, DonationDetails, DonationStatus, DonationType,
    Email, Location, MatchDetails, MatchStatus, PersonName, Urgency, User, UserId, UserProfile,
    UserRole,
};

/// Fixed instant `seconds` after 2025-01-01T00:00:00Z.
pub(crate) fn timestamp(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .expect("fixture timestamp is unambiguous")
        + chrono::Duration::seconds(seconds)
}

pub(crate) fn profile(
    role: UserRole,
    blood_group: &str,
    location: &str,
    is_available: bool,
) -> UserProfile {
    let email = format!("{}@example.org", uuid::Uuid::new_v4().simple());
    UserProfile {
        name: PersonName::new("Alex Example").expect("fixture name"),
        email: Email::new(email).expect("fixture email"),
        phone: None,
        blood_group: BloodGroup::new(blood_group).expect("fixture blood group"),
        location: Location::new(location).expect("fixture location"),
        age: Age::new(30).expect("fixture age"),
        weight: None,
        role,
        is_available,
        last_donation: None,
        medical_conditions: None,
        emergency_contact: None,
    }
}

pub(crate) fn user(role: UserRole, blood_group: &str, location: &str, is_available: bool) -> User {
    User::register(
        UserId::random(),
        profile(role, blood_group, location, is_available),
        timestamp(0),
    )
}

pub(crate) fn donation_details(
    donor_id: Option<UserId>,
    seeker_id: Option<UserId>,
) -> DonationDetails {
    DonationDetails {
        donor_id,
        seeker_id,
        blood_group: BloodGroup::new("O+").expect("fixture blood group"),
        amount_ml: Some(450),
        donation_type: DonationType::WholeBlood,
        location: Location::new("Leeds").expect("fixture location"),
        status: DonationStatus::Pending,
        urgency: Urgency::Normal,
        scheduled_at: None,
        completed_at: None,
    }
}

pub(crate) fn match_details(donor_id: UserId, seeker_id: UserId, score: i64) -> MatchDetails {
    MatchDetails {
        donor_id: Some(donor_id),
        seeker_id: Some(seeker_id),
        blood_group: BloodGroup::new("O+").expect("fixture blood group"),
        distance: Distance::ZERO,
        compatibility_score: CompatibilityScore::new(score).expect("fixture score"),
        status: MatchStatus::Pending,
    }
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl mockable::Clock for FixtureClock {
    fn local(&self) -> DateTime<chrono::Local> {
        self.utc_now.with_timezone(&chrono::Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Clock frozen at `timestamp(seconds)`.
pub(crate) fn fixture_clock(seconds: i64) -> std::sync::Arc<dyn mockable::Clock> {
    std::sync::Arc::new(FixtureClock {
        utc_now: timestamp(seconds),
    })
}

//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities for users, donations and matches,
//! the matching core that pairs donors with seekers, and the services that
//! implement the driving ports consumed by inbound adapters.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - User, Donation, Match: the three stored aggregates.
//! - AutomaticMatcher: scores donor/seeker pairs and stores matches.
//! - UserDirectoryService, DonationLedgerService, MatchService: driving port
//!   implementations.

pub mod blood_group;
pub mod donation;
pub mod donation_ledger_service;
pub mod donor_match;
pub mod error;
pub mod match_service;
pub mod matching;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_directory_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::blood_group::{BloodGroup, BloodProfileValidationError, Location};
pub use self::donation::{
    Donation, DonationDetails, DonationId, DonationStatus, DonationType, DonationValidationError,
    Urgency,
};
pub use self::donation_ledger_service::DonationLedgerService;
pub use self::donor_match::{
    CompatibilityScore, Distance, Match, MatchDetails, MatchId, MatchStatus, MatchValidationError,
    SCORE_MAX,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::match_service::MatchService;
pub use self::matching::{
    AdditiveScorer, AutoMatchOutcome, AutomaticMatcher, CompatibilityScorer, DistanceEstimator,
    MATCH_THRESHOLD, PlaceholderDistanceEstimator, ScoringInput,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    AGE_MAX, AGE_MIN, Age, Email, NAME_MAX, NAME_MIN, PersonName, User, UserId, UserProfile,
    UserRole, UserValidationError, WEIGHT_MIN_KG, Weight, normalise_optional_text,
};
pub use self::user_directory_service::UserDirectoryService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use bloodmatch::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such donor"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

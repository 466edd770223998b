//! Donor/seeker pairings held by the match store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{BloodGroup, UserId};

/// Validation errors for match values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchValidationError {
    #[error("match id must be a valid UUID")]
    InvalidId,
    #[error("compatibility score must be between 0 and 100, got {0}")]
    ScoreOutOfRange(i64),
    #[error("distance must be a non-negative number")]
    InvalidDistance,
    #[error("match status must be pending, accepted or declined")]
    UnknownStatus,
}

/// Stable match identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchId(Uuid);

impl MatchId {
    /// Parse an identifier from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, MatchValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| MatchValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Highest possible compatibility score.
pub const SCORE_MAX: u8 = 100;

/// Compatibility score in `0..=100`.
///
/// # Examples
/// ```
/// use bloodmatch::domain::CompatibilityScore;
///
/// assert_eq!(CompatibilityScore::new(80).map(|s| s.value()), Ok(80));
/// assert!(CompatibilityScore::new(101).is_err());
/// assert!(CompatibilityScore::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompatibilityScore(u8);

impl CompatibilityScore {
    /// Validate and construct a score.
    pub fn new(value: i64) -> Result<Self, MatchValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|score| *score <= SCORE_MAX)
            .map(Self)
            .ok_or(MatchValidationError::ScoreOutOfRange(value))
    }

    /// Score as an integer.
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Non-negative distance between two parties. The unit is informal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    /// Zero distance, used when both parties share a location.
    pub const ZERO: Self = Self(0.0);

    /// Validate and construct a distance.
    pub fn new(value: f64) -> Result<Self, MatchValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(MatchValidationError::InvalidDistance);
        }
        Ok(Self(value))
    }

    /// Raw distance value.
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// Lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl MatchStatus {
    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = MatchValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(MatchValidationError::UnknownStatus),
        }
    }
}

/// Mutable part of a match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDetails {
    pub donor_id: Option<UserId>,
    pub seeker_id: Option<UserId>,
    pub blood_group: BloodGroup,
    pub distance: Distance,
    pub compatibility_score: CompatibilityScore,
    pub status: MatchStatus,
}

impl MatchDetails {
    /// Whether `user` is the donor or the seeker.
    pub fn involves(&self, user: &UserId) -> bool {
        self.donor_id.as_ref() == Some(user) || self.seeker_id.as_ref() == Some(user)
    }
}

/// Stored pairing of a donor and a seeker.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    id: MatchId,
    details: MatchDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Match {
    /// Create a new match at `now`.
    pub fn create(id: MatchId, details: MatchDetails, now: DateTime<Utc>) -> Self {
        Self {
            id,
            details,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a match from stored state.
    pub fn restore(
        id: MatchId,
        details: MatchDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            details,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    /// Replace blood group, distance, score and status.
    ///
    /// Donor and seeker references are fixed at creation.
    #[must_use]
    pub fn with_details(self, details: MatchDetails, now: DateTime<Utc>) -> Self {
        let MatchDetails {
            donor_id, seeker_id, ..
        } = self.details;
        Self {
            details: MatchDetails {
                donor_id,
                seeker_id,
                ..details
            },
            updated_at: now.max(self.created_at),
            ..self
        }
    }

    pub fn id(&self) -> &MatchId {
        &self.id
    }

    pub fn details(&self) -> &MatchDetails {
        &self.details
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

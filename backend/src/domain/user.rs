//! Donor and seeker records held by the user directory.
//!
//! Every field that carries a constraint has its own validated type, so a
//! [`User`] cannot be assembled from out-of-range data.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;

use super::{BloodGroup, Location};

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email should be valid")]
    InvalidEmail,
    #[error("age must be between {min} and {max}")]
    AgeOutOfRange { min: u8, max: u8 },
    #[error("weight must be at least {min} kg")]
    WeightTooLow { min: f64 },
    #[error("role must be donor or seeker")]
    UnknownRole,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum allowed length for a person's name.
pub const NAME_MIN: usize = 2;
/// Maximum allowed length for a person's name.
pub const NAME_MAX: usize = 100;

/// Person name, trimmed and between [`NAME_MIN`] and [`NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a name.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        let length = trimmed.chars().count();
        if !(NAME_MIN..=NAME_MAX).contains(&length) {
            return Err(UserValidationError::NameLength {
                min: NAME_MIN,
                max: NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Contact email address. Unique across the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and construct an email address.
    ///
    /// # Examples
    /// ```
    /// use bloodmatch::domain::Email;
    ///
    /// assert!(Email::new("donor@example.org").is_ok());
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Youngest accepted age.
pub const AGE_MIN: u8 = 18;
/// Oldest accepted age.
pub const AGE_MAX: u8 = 65;

/// Age in whole years, [`AGE_MIN`] to [`AGE_MAX`] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Age(u8);

impl Age {
    /// Validate and construct an age.
    pub fn new(years: i64) -> Result<Self, UserValidationError> {
        u8::try_from(years)
            .ok()
            .filter(|value| (AGE_MIN..=AGE_MAX).contains(value))
            .map(Self)
            .ok_or(UserValidationError::AgeOutOfRange {
                min: AGE_MIN,
                max: AGE_MAX,
            })
    }

    /// Age in years.
    pub const fn years(self) -> u8 {
        self.0
    }
}

/// Lightest accepted body weight in kilograms.
pub const WEIGHT_MIN_KG: f64 = 45.0;

/// Body weight in kilograms, at least [`WEIGHT_MIN_KG`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    /// Validate and construct a weight.
    pub fn new(kilograms: f64) -> Result<Self, UserValidationError> {
        if !kilograms.is_finite() || kilograms < WEIGHT_MIN_KG {
            return Err(UserValidationError::WeightTooLow { min: WEIGHT_MIN_KG });
        }
        Ok(Self(kilograms))
    }

    /// Weight in kilograms.
    pub const fn kilograms(self) -> f64 {
        self.0
    }
}

/// Whether a user gives or needs blood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    Donor,
    Seeker,
}

impl UserRole {
    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Seeker => "seeker",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "donor" => Ok(Self::Donor),
            "seeker" => Ok(Self::Seeker),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Mutable part of a user record, supplied on registration and update.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<String>,
    pub blood_group: BloodGroup,
    pub location: Location,
    pub age: Age,
    pub weight: Option<Weight>,
    pub role: UserRole,
    pub is_available: bool,
    pub last_donation: Option<DateTime<Utc>>,
    pub medical_conditions: Option<String>,
    pub emergency_contact: Option<String>,
}

/// Registered donor or seeker.
///
/// ## Invariants
/// - `updated_at` is never earlier than `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    profile: UserProfile,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Register a new user at `now`.
    pub fn register(id: UserId, profile: UserProfile, now: DateTime<Utc>) -> Self {
        Self {
            id,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored state.
    pub fn restore(
        id: UserId,
        profile: UserProfile,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            profile,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    /// Replace the profile, keeping identity and creation time.
    #[must_use]
    pub fn with_profile(self, profile: UserProfile, now: DateTime<Utc>) -> Self {
        Self {
            profile,
            updated_at: now.max(self.created_at),
            ..self
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn email(&self) -> &Email {
        &self.profile.email
    }

    pub fn blood_group(&self) -> &BloodGroup {
        &self.profile.blood_group
    }

    pub fn location(&self) -> &Location {
        &self.profile.location
    }

    pub fn role(&self) -> UserRole {
        self.profile.role
    }

    pub fn is_available(&self) -> bool {
        self.profile.is_available
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Trim optional free text, folding blank values into `None`.
pub fn normalise_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests;

//! Donation requests tracked by the donation ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{BloodGroup, Location, UserId};

/// Validation errors for donation enums and identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DonationValidationError {
    #[error("donation id must be a valid UUID")]
    InvalidId,
    #[error("donation type must be whole_blood, platelets or plasma")]
    UnknownType,
    #[error("donation status must be pending, completed or cancelled")]
    UnknownStatus,
    #[error("urgency must be critical or normal")]
    UnknownUrgency,
}

/// Stable donation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DonationId(Uuid);

impl DonationId {
    /// Parse an identifier from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DonationValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| DonationValidationError::InvalidId)
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

impl fmt::Display for DonationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $error:expr, { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Wire and storage representation.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DonationValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err($error),
                }
            }
        }
    };
}

string_enum!(
    /// Blood product being donated.
    DonationType, DonationValidationError::UnknownType, {
        WholeBlood => "whole_blood",
        Platelets => "platelets",
        Plasma => "plasma",
    }
);

string_enum!(
    /// Lifecycle state of a donation request.
    DonationStatus, DonationValidationError::UnknownStatus, {
        Pending => "pending",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

string_enum!(
    /// How quickly a donation is needed.
    Urgency, DonationValidationError::UnknownUrgency, {
        Critical => "critical",
        Normal => "normal",
    }
);

impl Default for DonationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Self::Normal
    }
}

/// Mutable part of a donation, supplied on creation and update.
///
/// Donor and seeker are weak references; the ledger never checks that the
/// referenced users exist.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationDetails {
    pub donor_id: Option<UserId>,
    pub seeker_id: Option<UserId>,
    pub blood_group: BloodGroup,
    pub amount_ml: Option<u32>,
    pub donation_type: DonationType,
    pub location: Location,
    pub status: DonationStatus,
    pub urgency: Urgency,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DonationDetails {
    /// Whether the donation is critical and still pending.
    pub fn is_critical_pending(&self) -> bool {
        self.urgency == Urgency::Critical && self.status == DonationStatus::Pending
    }

    /// Whether `user` is the donor or the seeker.
    pub fn involves(&self, user: &UserId) -> bool {
        self.donor_id.as_ref() == Some(user) || self.seeker_id.as_ref() == Some(user)
    }
}

/// Donation request with identity and audit timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    id: DonationId,
    details: DonationDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Donation {
    /// Record a new donation at `now`.
    pub fn record(id: DonationId, details: DonationDetails, now: DateTime<Utc>) -> Self {
        Self {
            id,
            details,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a donation from stored state.
    pub fn restore(
        id: DonationId,
        details: DonationDetails,
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

    /// Replace the editable fields.
    ///
    /// Donor and seeker references are fixed at creation and survive updates.
    #[must_use]
    pub fn with_details(self, details: DonationDetails, now: DateTime<Utc>) -> Self {
        let DonationDetails {
            donor_id, seeker_id, ..
        } = self.details;
        Self {
            details: DonationDetails {
                donor_id,
                seeker_id,
                ..details
            },
            updated_at: now.max(self.created_at),
            ..self
        }
    }

    pub fn id(&self) -> &DonationId {
        &self.id
    }

    pub fn details(&self) -> &DonationDetails {
        &self.details
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

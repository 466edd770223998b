//! Driven port for the donation ledger store.

use async_trait::async_trait;

use crate::domain::{BloodGroup, Donation, DonationId, DonationStatus, Urgency, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by donation repository adapters.
    pub enum DonationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "donation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "donation repository query failed: {message}",
    }
}

/// Predicate used to select donations from the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationFilter {
    All,
    Donor(UserId),
    Seeker(UserId),
    /// Donations where the user is either the donor or the seeker.
    Party(UserId),
    BloodGroup(BloodGroup),
    Status(DonationStatus),
    Urgency(Urgency),
    BloodGroupAndStatus(BloodGroup, DonationStatus),
    /// Critical urgency and still pending.
    CriticalPending,
}

impl DonationFilter {
    /// Evaluate the filter against one donation.
    pub fn matches(&self, donation: &Donation) -> bool {
        let details = donation.details();
        match self {
            Self::All => true,
            Self::Donor(id) => details.donor_id.as_ref() == Some(id),
            Self::Seeker(id) => details.seeker_id.as_ref() == Some(id),
            Self::Party(id) => details.involves(id),
            Self::BloodGroup(group) => &details.blood_group == group,
            Self::Status(status) => details.status == *status,
            Self::Urgency(urgency) => details.urgency == *urgency,
            Self::BloodGroupAndStatus(group, status) => {
                &details.blood_group == group && details.status == *status
            }
            Self::CriticalPending => details.is_critical_pending(),
        }
    }
}

/// Port for storing and reading donations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Store a new donation.
    async fn insert(&self, donation: &Donation) -> Result<(), DonationRepositoryError>;

    /// Overwrite an existing donation.
    async fn update(&self, donation: &Donation) -> Result<(), DonationRepositoryError>;

    /// Remove a donation, returning whether a record was deleted.
    async fn delete(&self, id: &DonationId) -> Result<bool, DonationRepositoryError>;

    /// Fetch a donation by identifier.
    async fn find_by_id(&self, id: &DonationId)
    -> Result<Option<Donation>, DonationRepositoryError>;

    /// Fetch all donations selected by `filter`, oldest first.
    async fn find(&self, filter: &DonationFilter)
    -> Result<Vec<Donation>, DonationRepositoryError>;
}

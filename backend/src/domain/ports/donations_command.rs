//! Driving port for donation ledger mutations.

use async_trait::async_trait;

use crate::domain::{Donation, DonationDetails, DonationId, Error};

/// Domain use-case port for recording and editing donations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationsCommand: Send + Sync {
    /// Record a new donation request.
    async fn create_donation(&self, details: DonationDetails) -> Result<Donation, Error>;

    /// Replace the editable fields of a donation.
    async fn update_donation(
        &self,
        id: &DonationId,
        details: DonationDetails,
    ) -> Result<Donation, Error>;

    /// Remove a donation.
    async fn delete_donation(&self, id: &DonationId) -> Result<(), Error>;
}

//! Driving port for donation ledger reads.

use async_trait::async_trait;

use crate::domain::{Donation, DonationId, Error};

use super::DonationFilter;

/// Domain use-case port for looking donations up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationsQuery: Send + Sync {
    /// Fetch one donation. Missing donations surface as `not_found`.
    async fn get_donation(&self, id: &DonationId) -> Result<Donation, Error>;

    /// List donations selected by `filter`.
    async fn find_donations(&self, filter: &DonationFilter) -> Result<Vec<Donation>, Error>;
}

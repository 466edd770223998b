//! Donation ledger service implementing the donations driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    DonationFilter, DonationRepository, DonationRepositoryError, DonationsCommand, DonationsQuery,
};
use crate::domain::{Donation, DonationDetails, DonationId, Error};

/// Records and looks up donation requests.
pub struct DonationLedgerService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> Clone for DonationLedgerService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R> DonationLedgerService<R> {
    /// Create a new service over `repo`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> DonationLedgerService<R>
where
    R: DonationRepository,
{
    fn map_repository_error(error: DonationRepositoryError) -> Error {
        match error {
            DonationRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("donation ledger unavailable: {message}"))
            }
            DonationRepositoryError::Query { message } => {
                Error::internal(format!("donation ledger error: {message}"))
            }
        }
    }

    fn not_found(id: &DonationId) -> Error {
        Error::not_found("Donation not found").with_details(json!({ "id": id.to_string() }))
    }

    async fn load(&self, id: &DonationId) -> Result<Donation, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(id))
    }
}

#[async_trait]
impl<R> DonationsCommand for DonationLedgerService<R>
where
    R: DonationRepository,
{
    async fn create_donation(&self, details: DonationDetails) -> Result<Donation, Error> {
        let donation = Donation::record(DonationId::random(), details, self.clock.utc());
        self.repo
            .insert(&donation)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            donation_id = %donation.id(),
            urgency = %donation.details().urgency,
            "donation recorded"
        );
        Ok(donation)
    }

    async fn update_donation(
        &self,
        id: &DonationId,
        details: DonationDetails,
    ) -> Result<Donation, Error> {
        let existing = self.load(id).await?;
        let updated = existing.with_details(details, self.clock.utc());
        self.repo
            .update(&updated)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(updated)
    }

    async fn delete_donation(&self, id: &DonationId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(Self::not_found(id))
        }
    }
}

#[async_trait]
impl<R> DonationsQuery for DonationLedgerService<R>
where
    R: DonationRepository,
{
    async fn get_donation(&self, id: &DonationId) -> Result<Donation, Error> {
        self.load(id).await
    }

    async fn find_donations(&self, filter: &DonationFilter) -> Result<Vec<Donation>, Error> {
        self.repo
            .find(filter)
            .await
            .map_err(Self::map_repository_error)
    }
}

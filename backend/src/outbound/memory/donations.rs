//! In-memory donation ledger.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{DonationFilter, DonationRepository, DonationRepositoryError};
use crate::domain::{Donation, DonationId};

use super::lock;

/// Donation ledger held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDonationRepository {
    donations: Mutex<Vec<Donation>>,
}

impl InMemoryDonationRepository {
    fn guard(&self) -> Result<MutexGuard<'_, Vec<Donation>>, DonationRepositoryError> {
        lock(&self.donations, DonationRepositoryError::query)
    }
}

#[async_trait]
impl DonationRepository for InMemoryDonationRepository {
    async fn insert(&self, donation: &Donation) -> Result<(), DonationRepositoryError> {
        self.guard()?.push(donation.clone());
        Ok(())
    }

    async fn update(&self, donation: &Donation) -> Result<(), DonationRepositoryError> {
        let mut donations = self.guard()?;
        let stored = donations
            .iter_mut()
            .find(|stored| stored.id() == donation.id())
            .ok_or_else(|| {
                DonationRepositoryError::query(format!("donation {} does not exist", donation.id()))
            })?;
        *stored = donation.clone();
        Ok(())
    }

    async fn delete(&self, id: &DonationId) -> Result<bool, DonationRepositoryError> {
        let mut donations = self.guard()?;
        let before = donations.len();
        donations.retain(|donation| donation.id() != id);
        Ok(donations.len() != before)
    }

    async fn find_by_id(&self, id: &DonationId) -> Result<Option<Donation>, DonationRepositoryError> {
        Ok(self
            .guard()?
            .iter()
            .find(|donation| donation.id() == id)
            .cloned())
    }

    async fn find(&self, filter: &DonationFilter) -> Result<Vec<Donation>, DonationRepositoryError> {
        Ok(self
            .guard()?
            .iter()
            .filter(|donation| filter.matches(donation))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{donation_details, timestamp};
    use crate::domain::{BloodGroup, DonationStatus, Urgency, UserId};

    fn record(urgency: Urgency, donor: Option<UserId>, seeker: Option<UserId>) -> Donation {
        let mut details = donation_details(donor, seeker);
        details.urgency = urgency;
        Donation::record(DonationId::random(), details, timestamp(0))
    }

    #[tokio::test]
    async fn party_and_critical_filters_select_expected_rows() {
        let repo = InMemoryDonationRepository::default();
        let user = UserId::random();
        let as_donor = record(Urgency::Normal, Some(user), None);
        let as_seeker = record(Urgency::Critical, None, Some(user));
        let unrelated = record(Urgency::Critical, Some(UserId::random()), None);
        for donation in [&as_donor, &as_seeker, &unrelated] {
            repo.insert(donation).await.expect("insert");
        }

        let mine = repo
            .find(&DonationFilter::Party(user))
            .await
            .expect("find");
        let critical = repo
            .find(&DonationFilter::CriticalPending)
            .await
            .expect("find");

        assert_eq!(mine, vec![as_donor, as_seeker.clone()]);
        assert_eq!(critical, vec![as_seeker, unrelated]);
    }

    #[tokio::test]
    async fn blood_group_and_status_filter_needs_both_to_match() {
        let repo = InMemoryDonationRepository::default();
        let mut completed = donation_details(None, None);
        completed.status = DonationStatus::Completed;
        let completed = Donation::record(DonationId::random(), completed, timestamp(0));
        let mut other_group = donation_details(None, None);
        other_group.status = DonationStatus::Completed;
        other_group.blood_group = BloodGroup::new("AB-").expect("group");
        let other_group = Donation::record(DonationId::random(), other_group, timestamp(0));
        let pending = record(Urgency::Normal, None, None);
        for donation in [&completed, &other_group, &pending] {
            repo.insert(donation).await.expect("insert");
        }

        let group = BloodGroup::new("O+").expect("group");
        let found = repo
            .find(&DonationFilter::BloodGroupAndStatus(group, DonationStatus::Completed))
            .await
            .expect("find");

        assert_eq!(found, vec![completed]);
    }

    #[tokio::test]
    async fn update_of_unknown_donation_fails() {
        let repo = InMemoryDonationRepository::default();
        let error = repo
            .update(&record(Urgency::Normal, None, None))
            .await
            .expect_err("unknown row");
        assert!(matches!(error, DonationRepositoryError::Query { .. }));
    }
}

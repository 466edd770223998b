//! PostgreSQL-backed `DonationRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{DonationFilter, DonationRepository, DonationRepositoryError};
use crate::domain::{
    BloodGroup, Donation, DonationDetails, DonationId, DonationStatus, DonationType, Location,
    Urgency, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::corrupt_row;
use super::models::{DonationRow, DonationUpdate, NewDonationRow};
use super::pool::DbPool;
use super::schema::donations;

/// Diesel implementation of the donation ledger.
#[derive(Clone)]
pub struct DieselDonationRepository {
    pool: DbPool,
}

impl DieselDonationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &'static str,
) -> DonationRepositoryError {
    map_basic_diesel_error(
        error,
        operation,
        DonationRepositoryError::query,
        DonationRepositoryError::connection,
    )
}

fn invalid(id: Uuid, column: &str, error: impl std::fmt::Display) -> DonationRepositoryError {
    DonationRepositoryError::query(corrupt_row("donations", id, column, error))
}

fn row_to_donation(row: DonationRow) -> Result<Donation, DonationRepositoryError> {
    let id = row.id;
    let details = DonationDetails {
        donor_id: row.donor_id.map(UserId::from_uuid),
        seeker_id: row.seeker_id.map(UserId::from_uuid),
        blood_group: BloodGroup::new(&row.blood_group)
            .map_err(|err| invalid(id, "blood_group", err))?,
        amount_ml: row
            .amount_ml
            .map(u32::try_from)
            .transpose()
            .map_err(|err| invalid(id, "amount_ml", err))?,
        donation_type: row
            .donation_type
            .parse::<DonationType>()
            .map_err(|err| invalid(id, "donation_type", err))?,
        location: Location::new(&row.location).map_err(|err| invalid(id, "location", err))?,
        status: row
            .status
            .parse::<DonationStatus>()
            .map_err(|err| invalid(id, "status", err))?,
        urgency: row
            .urgency
            .parse::<Urgency>()
            .map_err(|err| invalid(id, "urgency", err))?,
        scheduled_at: row.scheduled_at,
        completed_at: row.completed_at,
    };
    Ok(Donation::restore(
        DonationId::from_uuid(id),
        details,
        row.created_at,
        row.updated_at,
    ))
}

fn amount_for_db(amount_ml: Option<u32>) -> Result<Option<i32>, DonationRepositoryError> {
    amount_ml
        .map(i32::try_from)
        .transpose()
        .map_err(|_| DonationRepositoryError::query("amount_ml exceeds the column range"))
}

#[async_trait]
impl DonationRepository for DieselDonationRepository {
    async fn insert(&self, donation: &Donation) -> Result<(), DonationRepositoryError> {
        let details = donation.details();
        let row = NewDonationRow {
            id: *donation.id().as_uuid(),
            donor_id: details.donor_id.map(|id| *id.as_uuid()),
            seeker_id: details.seeker_id.map(|id| *id.as_uuid()),
            blood_group: details.blood_group.as_str(),
            amount_ml: amount_for_db(details.amount_ml)?,
            donation_type: details.donation_type.as_str(),
            location: details.location.as_str(),
            status: details.status.as_str(),
            urgency: details.urgency.as_str(),
            scheduled_at: details.scheduled_at,
            completed_at: details.completed_at,
            created_at: donation.created_at(),
            updated_at: donation.updated_at(),
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, DonationRepositoryError::connection))?;
        diesel::insert_into(donations::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, "insert donation"))
    }

    async fn update(&self, donation: &Donation) -> Result<(), DonationRepositoryError> {
        let details = donation.details();
        let changes = DonationUpdate {
            blood_group: details.blood_group.as_str(),
            amount_ml: amount_for_db(details.amount_ml)?,
            donation_type: details.donation_type.as_str(),
            location: details.location.as_str(),
            status: details.status.as_str(),
            urgency: details.urgency.as_str(),
            scheduled_at: details.scheduled_at,
            completed_at: details.completed_at,
            updated_at: donation.updated_at(),
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, DonationRepositoryError::connection))?;
        let updated = diesel::update(donations::table.find(donation.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update donation"))?;
        if updated == 0 {
            return Err(DonationRepositoryError::query(format!(
                "update donation: {} does not exist",
                donation.id()
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: &DonationId) -> Result<bool, DonationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, DonationRepositoryError::connection))?;
        let deleted = diesel::delete(donations::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete donation"))?;
        Ok(deleted > 0)
    }

    async fn find_by_id(
        &self,
        id: &DonationId,
    ) -> Result<Option<Donation>, DonationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, DonationRepositoryError::connection))?;
        let row: Option<DonationRow> = donations::table
            .find(id.as_uuid())
            .select(DonationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find donation"))?;
        row.map(row_to_donation).transpose()
    }

    async fn find(
        &self,
        filter: &DonationFilter,
    ) -> Result<Vec<Donation>, DonationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, DonationRepositoryError::connection))?;
        let mut query = donations::table
            .select(DonationRow::as_select())
            .order((donations::created_at.asc(), donations::id.asc()))
            .into_boxed();
        query = match filter {
            DonationFilter::All => query,
            DonationFilter::Donor(id) => query.filter(donations::donor_id.eq(*id.as_uuid())),
            DonationFilter::Seeker(id) => query.filter(donations::seeker_id.eq(*id.as_uuid())),
            DonationFilter::Party(id) => query.filter(
                donations::donor_id
                    .eq(*id.as_uuid())
                    .or(donations::seeker_id.eq(*id.as_uuid())),
            ),
            DonationFilter::BloodGroup(group) => {
                query.filter(donations::blood_group.eq(group.as_str()))
            }
            DonationFilter::Status(status) => query.filter(donations::status.eq(status.as_str())),
            DonationFilter::Urgency(urgency) => {
                query.filter(donations::urgency.eq(urgency.as_str()))
            }
            DonationFilter::BloodGroupAndStatus(group, status) => query
                .filter(donations::blood_group.eq(group.as_str()))
                .filter(donations::status.eq(status.as_str())),
            DonationFilter::CriticalPending => query
                .filter(donations::urgency.eq(Urgency::Critical.as_str()))
                .filter(donations::status.eq(DonationStatus::Pending.as_str())),
        };
        let rows = query
            .load::<DonationRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list donations"))?;
        rows.into_iter().map(row_to_donation).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn row() -> DonationRow {
        let at = Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("timestamp");
        DonationRow {
            id: Uuid::new_v4(),
            donor_id: Some(Uuid::new_v4()),
            seeker_id: None,
            blood_group: "B+".to_owned(),
            amount_ml: Some(450),
            donation_type: "platelets".to_owned(),
            location: "Leeds".to_owned(),
            status: "completed".to_owned(),
            urgency: "critical".to_owned(),
            scheduled_at: Some(at),
            completed_at: Some(at),
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    fn row_converts_to_donation(row: DonationRow) {
        let donor = row.donor_id;
        let donation = row_to_donation(row).expect("row converts");
        let details = donation.details();

        assert_eq!(details.donor_id.map(|id| *id.as_uuid()), donor);
        assert_eq!(details.seeker_id, None);
        assert_eq!(details.donation_type, DonationType::Platelets);
        assert_eq!(details.status, DonationStatus::Completed);
        assert_eq!(details.urgency, Urgency::Critical);
        assert_eq!(details.amount_ml, Some(450));
    }

    #[rstest]
    fn negative_amounts_are_rejected(mut row: DonationRow) {
        row.amount_ml = Some(-1);
        let error = row_to_donation(row).expect_err("negative amount");
        assert!(error.to_string().contains("amount_ml"));
    }

    #[rstest]
    fn unknown_status_is_rejected(mut row: DonationRow) {
        row.status = "lost".to_owned();
        assert!(matches!(
            row_to_donation(row),
            Err(DonationRepositoryError::Query { .. })
        ));
    }

    #[rstest]
    #[case(None, Ok(None))]
    #[case(Some(500), Ok(Some(500)))]
    fn amounts_fit_the_column(
        #[case] amount: Option<u32>,
        #[case] expected: Result<Option<i32>, ()>,
    ) {
        assert_eq!(amount_for_db(amount).map_err(|_| ()), expected);
    }

    #[rstest]
    fn oversized_amounts_are_rejected() {
        assert!(amount_for_db(Some(u32::MAX)).is_err());
    }
}

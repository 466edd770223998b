//! PostgreSQL-backed `MatchRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{MatchFilter, MatchRepository, MatchRepositoryError};
use crate::domain::{
    BloodGroup, CompatibilityScore, Distance, Match, MatchDetails, MatchId, MatchStatus, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{contains_pattern, corrupt_row};
use super::models::{MatchRow, MatchUpdate, NewMatchRow};
use super::pool::DbPool;
use super::schema::{matches, users};

/// Diesel implementation of the match store.
#[derive(Clone)]
pub struct DieselMatchRepository {
    pool: DbPool,
}

impl DieselMatchRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error, operation: &'static str) -> MatchRepositoryError {
    map_basic_diesel_error(
        error,
        operation,
        MatchRepositoryError::query,
        MatchRepositoryError::connection,
    )
}

fn invalid(id: Uuid, column: &str, error: impl std::fmt::Display) -> MatchRepositoryError {
    MatchRepositoryError::query(corrupt_row("matches", id, column, error))
}

fn row_to_match(row: MatchRow) -> Result<Match, MatchRepositoryError> {
    let id = row.id;
    let details = MatchDetails {
        donor_id: row.donor_id.map(UserId::from_uuid),
        seeker_id: row.seeker_id.map(UserId::from_uuid),
        blood_group: BloodGroup::new(&row.blood_group)
            .map_err(|err| invalid(id, "blood_group", err))?,
        distance: Distance::new(row.distance).map_err(|err| invalid(id, "distance", err))?,
        compatibility_score: CompatibilityScore::new(i64::from(row.compatibility_score))
            .map_err(|err| invalid(id, "compatibility_score", err))?,
        status: row
            .status
            .parse::<MatchStatus>()
            .map_err(|err| invalid(id, "status", err))?,
    };
    Ok(Match::restore(
        MatchId::from_uuid(id),
        details,
        row.created_at,
        row.updated_at,
    ))
}

fn collect(rows: Vec<MatchRow>) -> Result<Vec<Match>, MatchRepositoryError> {
    rows.into_iter().map(row_to_match).collect()
}

#[async_trait]
impl MatchRepository for DieselMatchRepository {
    async fn insert(&self, record: &Match) -> Result<(), MatchRepositoryError> {
        let details = record.details();
        let row = NewMatchRow {
            id: *record.id().as_uuid(),
            donor_id: details.donor_id.map(|id| *id.as_uuid()),
            seeker_id: details.seeker_id.map(|id| *id.as_uuid()),
            blood_group: details.blood_group.as_str(),
            distance: details.distance.value(),
            compatibility_score: i16::from(details.compatibility_score.value()),
            status: details.status.as_str(),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, MatchRepositoryError::connection))?;
        diesel::insert_into(matches::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, "insert match"))
    }

    async fn update(&self, record: &Match) -> Result<(), MatchRepositoryError> {
        let details = record.details();
        let changes = MatchUpdate {
            blood_group: details.blood_group.as_str(),
            distance: details.distance.value(),
            compatibility_score: i16::from(details.compatibility_score.value()),
            status: details.status.as_str(),
            updated_at: record.updated_at(),
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, MatchRepositoryError::connection))?;
        let updated = diesel::update(matches::table.find(record.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update match"))?;
        if updated == 0 {
            return Err(MatchRepositoryError::query(format!(
                "update match: {} does not exist",
                record.id()
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: &MatchId) -> Result<bool, MatchRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, MatchRepositoryError::connection))?;
        let deleted = diesel::delete(matches::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete match"))?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, MatchRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, MatchRepositoryError::connection))?;
        let row: Option<MatchRow> = matches::table
            .find(id.as_uuid())
            .select(MatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find match"))?;
        row.map(row_to_match).transpose()
    }

    async fn find(&self, filter: &MatchFilter) -> Result<Vec<Match>, MatchRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, MatchRepositoryError::connection))?;
        let mut query = matches::table.select(MatchRow::as_select()).into_boxed();
        query = match filter {
            MatchFilter::All => query,
            MatchFilter::Donor(id) => query.filter(matches::donor_id.eq(*id.as_uuid())),
            MatchFilter::Seeker(id) => query.filter(matches::seeker_id.eq(*id.as_uuid())),
            MatchFilter::Party(id) => query.filter(
                matches::donor_id
                    .eq(*id.as_uuid())
                    .or(matches::seeker_id.eq(*id.as_uuid())),
            ),
            MatchFilter::BloodGroup(group) => query.filter(matches::blood_group.eq(group.as_str())),
            MatchFilter::Status(status) => query.filter(matches::status.eq(status.as_str())),
            MatchFilter::PendingByBloodGroup(group) => query
                .filter(matches::status.eq(MatchStatus::Pending.as_str()))
                .filter(matches::blood_group.eq(group.as_str())),
            MatchFilter::MinScore(threshold) => query.filter(
                matches::compatibility_score.ge(i16::from(threshold.value())),
            ),
        };
        if filter.orders_by_score() {
            query = query.order(matches::compatibility_score.desc());
            query = query.then_order_by(matches::created_at.asc());
        } else {
            query = query.order(matches::created_at.asc());
        }
        let rows = query
            .then_order_by(matches::id.asc())
            .load::<MatchRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list matches"))?;
        collect(rows)
    }

    async fn find_pending_near(&self, location: &str) -> Result<Vec<Match>, MatchRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, MatchRepositoryError::connection))?;
        let pattern = contains_pattern(location);
        let donors_near = users::table
            .filter(users::location.ilike(pattern.clone()))
            .select(users::id.nullable());
        let seekers_near = users::table
            .filter(users::location.ilike(pattern))
            .select(users::id.nullable());
        let rows = matches::table
            .filter(matches::status.eq(MatchStatus::Pending.as_str()))
            .filter(matches::donor_id.eq_any(donors_near))
            .filter(matches::seeker_id.eq_any(seekers_near))
            .select(MatchRow::as_select())
            .order((matches::created_at.asc(), matches::id.asc()))
            .load::<MatchRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list matches near location"))?;
        collect(rows)
    }
}

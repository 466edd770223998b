//! Match service implementing the matches driving ports.
//!
//! Direct match edits go straight to the [`MatchRepository`]; automatic
//! matching is delegated to an [`AutomaticMatcher`] sharing the same store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::matching::map_match_repository_error;
use crate::domain::ports::{MatchFilter, MatchRepository, MatchesCommand, MatchesQuery, UserRepository};
use crate::domain::{
    AutoMatchOutcome, AutomaticMatcher, BloodGroup, Error, Match, MatchDetails, MatchId,
};

/// Stores, edits and computes donor/seeker matches.
pub struct MatchService<U, M> {
    matches: Arc<M>,
    matcher: AutomaticMatcher<U, M>,
    clock: Arc<dyn Clock>,
}

impl<U, M> Clone for MatchService<U, M> {
    fn clone(&self) -> Self {
        Self {
            matches: Arc::clone(&self.matches),
            matcher: self.matcher.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<U, M> MatchService<U, M>
where
    U: UserRepository,
    M: MatchRepository,
{
    /// Create a service with the default scorer and distance estimator.
    pub fn new(users: Arc<U>, matches: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        let matcher = AutomaticMatcher::new(users, Arc::clone(&matches), Arc::clone(&clock));
        Self::with_matcher(matches, matcher, clock)
    }

    /// Create a service around a preconfigured matcher.
    ///
    /// `matcher` should write to the same store as `matches`.
    pub fn with_matcher(
        matches: Arc<M>,
        matcher: AutomaticMatcher<U, M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            matches,
            matcher,
            clock,
        }
    }

    fn not_found(id: &MatchId) -> Error {
        Error::not_found("Match not found").with_details(json!({ "id": id.to_string() }))
    }

    async fn load(&self, id: &MatchId) -> Result<Match, Error> {
        self.matches
            .find_by_id(id)
            .await
            .map_err(map_match_repository_error)?
            .ok_or_else(|| Self::not_found(id))
    }
}

#[async_trait]
impl<U, M> MatchesCommand for MatchService<U, M>
where
    U: UserRepository,
    M: MatchRepository,
{
    async fn create_match(&self, details: MatchDetails) -> Result<Match, Error> {
        let record = Match::create(MatchId::random(), details, self.clock.utc());
        self.matches
            .insert(&record)
            .await
            .map_err(map_match_repository_error)?;
        debug!(match_id = %record.id(), "match stored");
        Ok(record)
    }

    async fn update_match(&self, id: &MatchId, details: MatchDetails) -> Result<Match, Error> {
        let existing = self.load(id).await?;
        let updated = existing.with_details(details, self.clock.utc());
        self.matches
            .update(&updated)
            .await
            .map_err(map_match_repository_error)?;
        Ok(updated)
    }

    async fn delete_match(&self, id: &MatchId) -> Result<(), Error> {
        let removed = self
            .matches
            .delete(id)
            .await
            .map_err(map_match_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(Self::not_found(id))
        }
    }

    async fn create_automatic_matches(
        &self,
        blood_group: &BloodGroup,
    ) -> Result<AutoMatchOutcome, Error> {
        info!(blood_group = %blood_group, "automatic matching requested");
        self.matcher.run(blood_group).await
    }
}

#[async_trait]
impl<U, M> MatchesQuery for MatchService<U, M>
where
    U: UserRepository,
    M: MatchRepository,
{
    async fn get_match(&self, id: &MatchId) -> Result<Match, Error> {
        self.load(id).await
    }

    async fn find_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, Error> {
        self.matches
            .find(filter)
            .await
            .map_err(map_match_repository_error)
    }

    async fn find_potential_matches(
        &self,
        _blood_group: &BloodGroup,
        location: &str,
    ) -> Result<Vec<Match>, Error> {
        self.matches
            .find_pending_near(location)
            .await
            .map_err(map_match_repository_error)
    }
}

//! Automatic donor/seeker matching for one blood group.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    MatchRepository, MatchRepositoryError, UserFilter, UserRepository, UserRepositoryError,
};
use crate::domain::{
    BloodGroup, CompatibilityScore, Distance, Error, Match, MatchDetails, MatchId, MatchStatus,
    User, UserRole,
};

use super::{AdditiveScorer, CompatibilityScorer, DistanceEstimator, PlaceholderDistanceEstimator};

/// Lowest score that produces a match.
pub const MATCH_THRESHOLD: i64 = 50;

/// Summary of one automatic matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoMatchOutcome {
    pub blood_group: BloodGroup,
    /// Donor/seeker pairs scored.
    pub evaluated_pairs: usize,
    /// Matches persisted by this run.
    pub created_matches: usize,
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::conflict("Email already exists").with_details(json!({
                "field": "email",
                "value": email,
                "code": "duplicate_email",
            }))
        }
    }
}

pub(crate) fn map_match_repository_error(error: MatchRepositoryError) -> Error {
    match error {
        MatchRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("match store unavailable: {message}"))
        }
        MatchRepositoryError::Query { message } => {
            Error::internal(format!("match store error: {message}"))
        }
    }
}

/// Pairs available donors with available seekers of one blood group.
///
/// Every donor is scored against every seeker (seekers in the outer loop).
/// Pairs scoring at least [`MATCH_THRESHOLD`] are stored as pending matches
/// tagged with the requested blood group. Runs are not serialised and not
/// de-duplicated.
pub struct AutomaticMatcher<U, M> {
    users: Arc<U>,
    matches: Arc<M>,
    scorer: Arc<dyn CompatibilityScorer>,
    estimator: Arc<dyn DistanceEstimator>,
    clock: Arc<dyn Clock>,
}

impl<U, M> Clone for AutomaticMatcher<U, M> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            matches: Arc::clone(&self.matches),
            scorer: Arc::clone(&self.scorer),
            estimator: Arc::clone(&self.estimator),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<U, M> AutomaticMatcher<U, M>
where
    U: UserRepository,
    M: MatchRepository,
{
    /// Build a matcher with the additive scorer and placeholder estimator.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use bloodmatch::domain::AutomaticMatcher;
    /// use bloodmatch::outbound::memory::{InMemoryMatchRepository, InMemoryUserRepository};
    /// use mockable::DefaultClock;
    ///
    /// let users = Arc::new(InMemoryUserRepository::default());
    /// let matches = Arc::new(InMemoryMatchRepository::new(Arc::clone(&users)));
    /// let _matcher = AutomaticMatcher::new(users, matches, Arc::new(DefaultClock));
    /// ```
    pub fn new(users: Arc<U>, matches: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            matches,
            scorer: Arc::new(AdditiveScorer),
            estimator: Arc::new(PlaceholderDistanceEstimator),
            clock,
        }
    }

    /// Replace the compatibility scorer.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Arc<dyn CompatibilityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replace the distance estimator.
    #[must_use]
    pub fn with_estimator(mut self, estimator: Arc<dyn DistanceEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Run one matching pass for `blood_group`.
    ///
    /// # Errors
    /// - `service_unavailable` or `internal` when the directory or the match
    ///   store fails. Matches stored before the failure are kept.
    /// - `internal` when the scorer or estimator produces an out-of-range
    ///   value; nothing further is stored.
    pub async fn run(&self, blood_group: &BloodGroup) -> Result<AutoMatchOutcome, Error> {
        let donors = self.available(blood_group, UserRole::Donor).await?;
        let seekers = self.available(blood_group, UserRole::Seeker).await?;
        debug!(
            blood_group = %blood_group,
            donors = donors.len(),
            seekers = seekers.len(),
            "starting automatic matching"
        );

        let mut outcome = AutoMatchOutcome {
            blood_group: blood_group.clone(),
            evaluated_pairs: 0,
            created_matches: 0,
        };

        for seeker in &seekers {
            for donor in &donors {
                outcome.evaluated_pairs += 1;
                let Some(record) = self.evaluate(blood_group, donor, seeker)? else {
                    continue;
                };
                self.matches
                    .insert(&record)
                    .await
                    .map_err(map_match_repository_error)?;
                outcome.created_matches += 1;
            }
        }

        info!(
            blood_group = %blood_group,
            evaluated_pairs = outcome.evaluated_pairs,
            created_matches = outcome.created_matches,
            "automatic matching finished"
        );
        Ok(outcome)
    }

    async fn available(&self, blood_group: &BloodGroup, role: UserRole) -> Result<Vec<User>, Error> {
        let filter = UserFilter::AvailableByBloodGroup {
            blood_group: blood_group.clone(),
            role,
        };
        self.users
            .find(&filter)
            .await
            .map_err(map_user_repository_error)
    }

    fn evaluate(
        &self,
        blood_group: &BloodGroup,
        donor: &User,
        seeker: &User,
    ) -> Result<Option<Match>, Error> {
        let raw_score = self.scorer.score(donor, seeker);
        let compatibility_score = CompatibilityScore::new(raw_score).map_err(|err| {
            warn!(score = raw_score, donor = %donor.id(), seeker = %seeker.id(), "scorer out of range");
            Error::internal(err.to_string()).with_details(json!({
                "code": "score_out_of_range",
                "value": raw_score,
            }))
        })?;
        if i64::from(compatibility_score.value()) < MATCH_THRESHOLD {
            return Ok(None);
        }

        let raw_distance = self
            .estimator
            .estimate(donor.location().as_str(), seeker.location().as_str());
        let distance = Distance::new(raw_distance).map_err(|err| {
            warn!(distance = raw_distance, "distance estimator out of range");
            Error::internal(err.to_string()).with_details(json!({
                "code": "invalid_distance",
            }))
        })?;

        let details = MatchDetails {
            donor_id: Some(*donor.id()),
            seeker_id: Some(*seeker.id()),
            blood_group: blood_group.clone(),
            distance,
            compatibility_score,
            status: MatchStatus::Pending,
        };
        Ok(Some(Match::create(MatchId::random(), details, self.clock.utc())))
    }
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;

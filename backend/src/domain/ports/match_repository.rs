//! Driven port for the match store.

use async_trait::async_trait;

use crate::domain::{BloodGroup, CompatibilityScore, Match, MatchId, MatchStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by match repository adapters.
    pub enum MatchRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "match repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "match repository query failed: {message}",
    }
}

/// Predicate used to select matches from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFilter {
    All,
    Donor(UserId),
    Seeker(UserId),
    /// Matches where the user is either the donor or the seeker.
    Party(UserId),
    BloodGroup(BloodGroup),
    Status(MatchStatus),
    PendingByBloodGroup(BloodGroup),
    /// Score at or above the threshold. Results are ordered by score,
    /// highest first.
    MinScore(CompatibilityScore),
}

impl MatchFilter {
    /// Evaluate the filter against one match.
    pub fn matches(&self, candidate: &Match) -> bool {
        let details = candidate.details();
        match self {
            Self::All => true,
            Self::Donor(id) => details.donor_id.as_ref() == Some(id),
            Self::Seeker(id) => details.seeker_id.as_ref() == Some(id),
            Self::Party(id) => details.involves(id),
            Self::BloodGroup(group) => &details.blood_group == group,
            Self::Status(status) => details.status == *status,
            Self::PendingByBloodGroup(group) => {
                details.status == MatchStatus::Pending && &details.blood_group == group
            }
            Self::MinScore(threshold) => details.compatibility_score >= *threshold,
        }
    }

    /// Whether results must be sorted by descending score.
    pub fn orders_by_score(&self) -> bool {
        matches!(self, Self::MinScore(_))
    }
}

/// Port for storing and reading matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Store a new match.
    async fn insert(&self, record: &Match) -> Result<(), MatchRepositoryError>;

    /// Overwrite an existing match.
    async fn update(&self, record: &Match) -> Result<(), MatchRepositoryError>;

    /// Remove a match, returning whether a record was deleted.
    async fn delete(&self, id: &MatchId) -> Result<bool, MatchRepositoryError>;

    /// Fetch a match by identifier.
    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, MatchRepositoryError>;

    /// Fetch all matches selected by `filter`.
    ///
    /// Results are oldest first unless [`MatchFilter::orders_by_score`] holds.
    async fn find(&self, filter: &MatchFilter) -> Result<Vec<Match>, MatchRepositoryError>;

    /// Pending matches where both the donor's and the seeker's locations
    /// contain `location`, ignoring case.
    async fn find_pending_near(&self, location: &str) -> Result<Vec<Match>, MatchRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::test_fixtures::{match_details, timestamp};
    use crate::domain::MatchDetails;
    use rstest::rstest;

    fn record(score: i64, status: MatchStatus) -> Match {
        Match::create(
            MatchId::random(),
            MatchDetails {
                status,
                ..match_details(UserId::random(), UserId::random(), score)
            },
            timestamp(0),
        )
    }

    #[rstest]
    #[case(79, false)]
    #[case(80, true)]
    #[case(100, true)]
    fn min_score_is_inclusive(#[case] score: i64, #[case] expected: bool) {
        let threshold = CompatibilityScore::new(80).expect("valid");
        let filter = MatchFilter::MinScore(threshold);
        assert_eq!(filter.matches(&record(score, MatchStatus::Pending)), expected);
        assert!(filter.orders_by_score());
    }

    #[rstest]
    fn pending_by_blood_group_skips_settled_matches() {
        let group = BloodGroup::new("O+").expect("valid");
        let filter = MatchFilter::PendingByBloodGroup(group);

        assert!(filter.matches(&record(60, MatchStatus::Pending)));
        assert!(!filter.matches(&record(60, MatchStatus::Accepted)));
        assert!(!filter.orders_by_score());
    }
}

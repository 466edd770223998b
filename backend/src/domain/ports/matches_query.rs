//! Driving port for match reads.

use async_trait::async_trait;

use crate::domain::{BloodGroup, Error, Match, MatchId};

use super::MatchFilter;

/// Domain use-case port for looking matches up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchesQuery: Send + Sync {
    /// Fetch one match. Missing matches surface as `not_found`.
    async fn get_match(&self, id: &MatchId) -> Result<Match, Error>;

    /// List matches selected by `filter`.
    async fn find_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, Error>;

    /// Pending matches whose donor and seeker are both located in
    /// `location`. The blood group is accepted for route compatibility and
    /// does not narrow the result.
    async fn find_potential_matches(
        &self,
        blood_group: &BloodGroup,
        location: &str,
    ) -> Result<Vec<Match>, Error>;
}

//! Driving port for match mutations, including automatic matching.

use async_trait::async_trait;

use crate::domain::{AutoMatchOutcome, BloodGroup, Error, Match, MatchDetails, MatchId};

/// Domain use-case port for creating and editing matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchesCommand: Send + Sync {
    /// Store a match supplied by the caller.
    async fn create_match(&self, details: MatchDetails) -> Result<Match, Error>;

    /// Replace blood group, distance, score and status of a match.
    async fn update_match(&self, id: &MatchId, details: MatchDetails) -> Result<Match, Error>;

    /// Remove a match.
    async fn delete_match(&self, id: &MatchId) -> Result<(), Error>;

    /// Pair every available donor with every available seeker of
    /// `blood_group`, persisting each pair that scores at least 50.
    ///
    /// Runs are not de-duplicated: calling this twice stores every
    /// qualifying pair twice. The first persistence failure aborts the run
    /// without rolling back matches already stored.
    async fn create_automatic_matches(
        &self,
        blood_group: &BloodGroup,
    ) -> Result<AutoMatchOutcome, Error>;
}

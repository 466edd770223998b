//! In-memory match store.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{MatchFilter, MatchRepository, MatchRepositoryError};
use crate::domain::{Match, MatchId, MatchStatus, UserId};

use super::{InMemoryUserRepository, lock};

/// Match store held in process memory.
///
/// Holds the user directory so location queries can join on the donor and
/// seeker records, mirroring the relational adapter.
#[derive(Debug)]
pub struct InMemoryMatchRepository {
    matches: Mutex<Vec<Match>>,
    users: Arc<InMemoryUserRepository>,
}

impl InMemoryMatchRepository {
    /// Create an empty store joined to `users`.
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            matches: Mutex::new(Vec::new()),
            users,
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<Match>>, MatchRepositoryError> {
        lock(&self.matches, MatchRepositoryError::query)
    }

    fn located_in(&self, user: Option<&UserId>, needle: &str) -> Result<bool, MatchRepositoryError> {
        let Some(id) = user else {
            return Ok(false);
        };
        let stored = self
            .users
            .snapshot(id)
            .map_err(|err| MatchRepositoryError::query(err.to_string()))?;
        Ok(stored.is_some_and(|user| user.location().contains_ignore_case(needle)))
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    async fn insert(&self, record: &Match) -> Result<(), MatchRepositoryError> {
        self.guard()?.push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &Match) -> Result<(), MatchRepositoryError> {
        let mut matches = self.guard()?;
        let stored = matches
            .iter_mut()
            .find(|stored| stored.id() == record.id())
            .ok_or_else(|| {
                MatchRepositoryError::query(format!("match {} does not exist", record.id()))
            })?;
        *stored = record.clone();
        Ok(())
    }

    async fn delete(&self, id: &MatchId) -> Result<bool, MatchRepositoryError> {
        let mut matches = self.guard()?;
        let before = matches.len();
        matches.retain(|record| record.id() != id);
        Ok(matches.len() != before)
    }

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, MatchRepositoryError> {
        Ok(self.guard()?.iter().find(|record| record.id() == id).cloned())
    }

    async fn find(&self, filter: &MatchFilter) -> Result<Vec<Match>, MatchRepositoryError> {
        let mut found: Vec<Match> = self
            .guard()?
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        if filter.orders_by_score() {
            found.sort_by_key(|record| Reverse(record.details().compatibility_score));
        }
        Ok(found)
    }

    async fn find_pending_near(&self, location: &str) -> Result<Vec<Match>, MatchRepositoryError> {
        let pending: Vec<Match> = self
            .guard()?
            .iter()
            .filter(|record| record.details().status == MatchStatus::Pending)
            .cloned()
            .collect();
        let mut near = Vec::new();
        for record in pending {
            let details = record.details();
            if self.located_in(details.donor_id.as_ref(), location)?
                && self.located_in(details.seeker_id.as_ref(), location)?
            {
                near.push(record);
            }
        }
        Ok(near)
    }
}

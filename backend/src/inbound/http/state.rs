//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DonationsCommand, DonationsQuery, MatchesCommand, MatchesQuery, UsersCommand, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub donations: Arc<dyn DonationsCommand>,
    pub donations_query: Arc<dyn DonationsQuery>,
    pub matches: Arc<dyn MatchesCommand>,
    pub matches_query: Arc<dyn MatchesQuery>,
}

impl HttpState {
    /// Build state from three services that each implement both halves of
    /// their command/query pair.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use bloodmatch::domain::{DonationLedgerService, MatchService, UserDirectoryService};
    /// use bloodmatch::inbound::http::state::HttpState;
    /// use bloodmatch::outbound::memory::{
    ///     InMemoryDonationRepository, InMemoryMatchRepository, InMemoryUserRepository,
    /// };
    /// use mockable::DefaultClock;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(InMemoryUserRepository::default());
    /// let matches = Arc::new(InMemoryMatchRepository::new(users.clone()));
    /// let state = HttpState::from_services(
    ///     Arc::new(UserDirectoryService::new(users.clone(), clock.clone())),
    ///     Arc::new(DonationLedgerService::new(
    ///         Arc::new(InMemoryDonationRepository::default()),
    ///         clock.clone(),
    ///     )),
    ///     Arc::new(MatchService::new(users, matches, clock)),
    /// );
    /// let _users = state.users_query.clone();
    /// ```
    pub fn from_services<U, D, M>(users: Arc<U>, donations: Arc<D>, matches: Arc<M>) -> Self
    where
        U: UsersCommand + UsersQuery + 'static,
        D: DonationsCommand + DonationsQuery + 'static,
        M: MatchesCommand + MatchesQuery + 'static,
    {
        Self {
            users: users.clone(),
            users_query: users,
            donations: donations.clone(),
            donations_query: donations,
            matches: matches.clone(),
            matches_query: matches,
        }
    }
}

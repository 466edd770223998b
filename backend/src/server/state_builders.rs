//! Builders wiring domain services to their storage adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use bloodmatch::domain::ports::{DonationRepository, MatchRepository, UserRepository};
use bloodmatch::domain::{DonationLedgerService, MatchService, UserDirectoryService};
use bloodmatch::inbound::http::state::HttpState;
use bloodmatch::outbound::memory::{
    InMemoryDonationRepository, InMemoryMatchRepository, InMemoryUserRepository,
};
use bloodmatch::outbound::persistence::{
    DbPool, DieselDonationRepository, DieselMatchRepository, DieselUserRepository,
};

use super::ServerConfig;

fn state_from_repositories<U, D, M>(
    users: Arc<U>,
    donations: Arc<D>,
    matches: Arc<M>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    D: DonationRepository + 'static,
    M: MatchRepository + 'static,
{
    HttpState::from_services(
        Arc::new(UserDirectoryService::new(Arc::clone(&users), Arc::clone(&clock))),
        Arc::new(DonationLedgerService::new(donations, Arc::clone(&clock))),
        Arc::new(MatchService::new(users, matches, clock)),
    )
}

fn build_persistent_state(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpState {
    state_from_repositories(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselDonationRepository::new(pool.clone())),
        Arc::new(DieselMatchRepository::new(pool.clone())),
        clock,
    )
}

fn build_in_memory_state(clock: Arc<dyn Clock>) -> HttpState {
    let users = Arc::new(InMemoryUserRepository::default());
    let matches = Arc::new(InMemoryMatchRepository::new(Arc::clone(&users)));
    state_from_repositories(
        users,
        Arc::new(InMemoryDonationRepository::default()),
        matches,
        clock,
    )
}

/// Build the shared HTTP state from the server configuration.
///
/// Diesel repositories back the services when a pool is configured; otherwise
/// every store lives in process memory and is lost on shutdown.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => build_persistent_state(pool, clock),
        None => {
            info!("no database configured; using in-memory stores");
            build_in_memory_state(clock)
        }
    };
    web::Data::new(state)
}

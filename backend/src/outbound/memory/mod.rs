//! In-memory repository adapters.
//!
//! Back every driven port with a mutex-guarded vector so the service can run
//! without PostgreSQL and so behaviour tests can exercise real adapters.
//! Records are returned in insertion order unless a filter says otherwise.

mod donations;
mod matches;
mod users;

pub use donations::InMemoryDonationRepository;
pub use matches::InMemoryMatchRepository;
pub use users::InMemoryUserRepository;

use std::sync::{Mutex, MutexGuard};

/// Lock `store`, reporting a poisoned mutex through `on_poison`.
fn lock<'a, T, E>(
    store: &'a Mutex<Vec<T>>,
    on_poison: impl FnOnce(String) -> E,
) -> Result<MutexGuard<'a, Vec<T>>, E> {
    store
        .lock()
        .map_err(|err| on_poison(format!("in-memory store poisoned: {err}")))
}

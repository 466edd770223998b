//! PostgreSQL persistence adapters.
//!
//! Repositories translate between Diesel rows (`models.rs`, `schema.rs`) and
//! domain aggregates; rows never leave this module. Connections come from a
//! `bb8` pool of `diesel-async` connections.
//!
//! # Example
//!
//! ```ignore
//! use bloodmatch::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bloodmatch")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_donation_repository;
mod diesel_helpers;
mod diesel_match_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_donation_repository::DieselDonationRepository;
pub use diesel_match_repository::DieselMatchRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};

//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports (`*Command`, `*Query`) are implemented by domain services and called
//! by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod donation_repository;
mod donations_command;
mod donations_query;
mod match_repository;
mod matches_command;
mod matches_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use donation_repository::MockDonationRepository;
pub use donation_repository::{DonationFilter, DonationRepository, DonationRepositoryError};
#[cfg(test)]
pub use donations_command::MockDonationsCommand;
pub use donations_command::DonationsCommand;
#[cfg(test)]
pub use donations_query::MockDonationsQuery;
pub use donations_query::DonationsQuery;
#[cfg(test)]
pub use match_repository::MockMatchRepository;
pub use match_repository::{MatchFilter, MatchRepository, MatchRepositoryError};
#[cfg(test)]
pub use matches_command::MockMatchesCommand;
pub use matches_command::MatchesCommand;
#[cfg(test)]
pub use matches_query::MockMatchesQuery;
pub use matches_query::MatchesQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, UserFilter, UserRepository, UserRepositoryError,
};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;

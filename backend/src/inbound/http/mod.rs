//! HTTP inbound adapter exposing REST endpoints.

pub mod donations;
pub mod error;
pub mod health;
pub mod matches;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories built on Diesel.
//! - **memory**: process-local repositories used when no database is
//!   configured and by behaviour tests.
//!
//! Adapters only translate between domain types and storage
//! representations.

pub mod memory;
pub mod persistence;

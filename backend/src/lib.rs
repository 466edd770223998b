//! Blood-donation matching backend.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, ports and
//! the matching core, [`inbound`] adapts HTTP onto the driving ports and
//! [`outbound`] implements the driven ports with Diesel or in-memory stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler together with the request and
//! response bodies they exchange. Domain types stay free of utoipa; the error
//! envelope is described by [`ErrorSchema`] and [`ErrorCodeSchema`].
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::donations::{DonationRequest, DonationResponse};
use crate::inbound::http::matches::{AutoMatchResponse, MatchRequest, MatchResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{UserRequest, UserResponse};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bloodmatch backend API",
        description = "Donor and seeker directory, donation ledger and automatic matching."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::get_user_by_email,
        crate::inbound::http::users::list_users_by_blood_group,
        crate::inbound::http::users::list_users_by_location,
        crate::inbound::http::users::list_available_donors,
        crate::inbound::http::users::list_available_seekers,
        crate::inbound::http::donations::create_donation,
        crate::inbound::http::donations::list_donations,
        crate::inbound::http::donations::list_critical_donations,
        crate::inbound::http::donations::get_donation,
        crate::inbound::http::donations::update_donation,
        crate::inbound::http::donations::delete_donation,
        crate::inbound::http::donations::list_donations_by_donor,
        crate::inbound::http::donations::list_donations_by_seeker,
        crate::inbound::http::donations::list_donations_by_user,
        crate::inbound::http::donations::list_donations_by_blood_group,
        crate::inbound::http::donations::list_donations_by_status,
        crate::inbound::http::donations::list_donations_by_urgency,
        crate::inbound::http::matches::create_match,
        crate::inbound::http::matches::list_matches,
        crate::inbound::http::matches::list_high_compatibility_matches,
        crate::inbound::http::matches::get_match,
        crate::inbound::http::matches::update_match,
        crate::inbound::http::matches::delete_match,
        crate::inbound::http::matches::list_matches_by_donor,
        crate::inbound::http::matches::list_matches_by_seeker,
        crate::inbound::http::matches::list_matches_by_user,
        crate::inbound::http::matches::list_matches_by_blood_group,
        crate::inbound::http::matches::list_matches_by_status,
        crate::inbound::http::matches::find_potential_matches,
        crate::inbound::http::matches::create_automatic_matches,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserRequest,
        UserResponse,
        DonationRequest,
        DonationResponse,
        MatchRequest,
        MatchResponse,
        AutoMatchResponse,
    )),
    tags(
        (name = "users", description = "Donor and seeker directory"),
        (name = "donations", description = "Donation requests"),
        (name = "matches", description = "Donor/seeker matches and automatic matching"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

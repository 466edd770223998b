//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use crate::domain::ports::{
    MockDonationsCommand, MockDonationsQuery, MockMatchesCommand, MockMatchesQuery,
    MockUsersCommand, MockUsersQuery,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{donations, matches, users};

/// Port mocks for one handler test. Ports left untouched reject every call.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub users: MockUsersCommand,
    pub users_query: MockUsersQuery,
    pub donations: MockDonationsCommand,
    pub donations_query: MockDonationsQuery,
    pub matches: MockMatchesCommand,
    pub matches_query: MockMatchesQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
            donations: Arc::new(self.donations),
            donations_query: Arc::new(self.donations_query),
            matches: Arc::new(self.matches),
            matches_query: Arc::new(self.matches_query),
        }
    }
}

/// Build an app exposing every REST route under `/api/v1`.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .configure(users::configure)
            .configure(donations::configure)
            .configure(matches::configure),
    )
}

/// Send one request through a fresh app, returning status and JSON body.
///
/// Empty bodies decode to `Value::Null`.
pub(crate) async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

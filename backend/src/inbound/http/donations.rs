//! Donation ledger HTTP handlers.
//!
//! ```text
//! POST /api/v1/donations
//! GET /api/v1/donations/status/pending
//! GET /api/v1/donations/critical
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::DonationFilter;
use crate::domain::{
    Donation, DonationDetails, DonationId, DonationStatus, DonationType, Error, Location, Urgency,
    UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::parse_blood_group;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_optional_rfc3339_timestamp, parse_optional_uuid,
    parse_text, parse_uuid,
};

const ID: FieldName = FieldName::new("id");
const DONOR_ID: FieldName = FieldName::new("donorId");
const SEEKER_ID: FieldName = FieldName::new("seekerId");
const USER_ID: FieldName = FieldName::new("userId");
const AMOUNT_ML: FieldName = FieldName::new("amountMl");
const DONATION_TYPE: FieldName = FieldName::new("donationType");
const LOCATION: FieldName = FieldName::new("location");
const STATUS: FieldName = FieldName::new("status");
const URGENCY: FieldName = FieldName::new("urgency");
const SCHEDULED_AT: FieldName = FieldName::new("scheduledAt");
const COMPLETED_AT: FieldName = FieldName::new("completedAt");

/// Payload for recording or editing a donation.
///
/// Donor and seeker are only read on creation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    #[schema(format = "uuid")]
    pub donor_id: Option<String>,
    #[schema(format = "uuid")]
    pub seeker_id: Option<String>,
    pub blood_group: String,
    #[schema(minimum = 0)]
    pub amount_ml: Option<i64>,
    #[schema(example = "whole_blood")]
    pub donation_type: String,
    pub location: String,
    #[schema(example = "pending")]
    pub status: Option<String>,
    #[schema(example = "normal")]
    pub urgency: Option<String>,
    #[schema(format = "date-time")]
    pub scheduled_at: Option<String>,
    #[schema(format = "date-time")]
    pub completed_at: Option<String>,
}

/// Donation as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub donor_id: Option<String>,
    #[schema(format = "uuid")]
    pub seeker_id: Option<String>,
    pub blood_group: String,
    pub amount_ml: Option<u32>,
    pub donation_type: String,
    pub location: String,
    pub status: String,
    pub urgency: String,
    #[schema(format = "date-time")]
    pub scheduled_at: Option<String>,
    #[schema(format = "date-time")]
    pub completed_at: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Donation> for DonationResponse {
    fn from(donation: Donation) -> Self {
        let details = donation.details();
        Self {
            id: donation.id().to_string(),
            donor_id: details.donor_id.map(|id| id.to_string()),
            seeker_id: details.seeker_id.map(|id| id.to_string()),
            blood_group: details.blood_group.as_str().to_owned(),
            amount_ml: details.amount_ml,
            donation_type: details.donation_type.as_str().to_owned(),
            location: details.location.as_str().to_owned(),
            status: details.status.as_str().to_owned(),
            urgency: details.urgency.as_str().to_owned(),
            scheduled_at: details.scheduled_at.map(|at| at.to_rfc3339()),
            completed_at: details.completed_at.map(|at| at.to_rfc3339()),
            created_at: donation.created_at().to_rfc3339(),
            updated_at: donation.updated_at().to_rfc3339(),
        }
    }
}

fn parse_amount(amount: Option<i64>) -> Result<Option<u32>, Error> {
    amount
        .map(|ml| {
            u32::try_from(ml).map_err(|_| {
                invalid_value_error(
                    AMOUNT_ML,
                    "amount must be a non-negative number of millilitres",
                    Some(&ml.to_string()),
                )
            })
        })
        .transpose()
}

fn parse_donation_request(payload: DonationRequest) -> Result<DonationDetails, Error> {
    Ok(DonationDetails {
        donor_id: parse_optional_uuid(payload.donor_id.as_deref(), DONOR_ID)?
            .map(UserId::from_uuid),
        seeker_id: parse_optional_uuid(payload.seeker_id.as_deref(), SEEKER_ID)?
            .map(UserId::from_uuid),
        blood_group: parse_blood_group(&payload.blood_group)?,
        amount_ml: parse_amount(payload.amount_ml)?,
        donation_type: parse_text::<DonationType>(&payload.donation_type, DONATION_TYPE)?,
        location: Location::new(&payload.location)
            .map_err(|err| invalid_value_error(LOCATION, err, Some(&payload.location)))?,
        status: payload
            .status
            .as_deref()
            .map(|raw| parse_text::<DonationStatus>(raw, STATUS))
            .transpose()?
            .unwrap_or_default(),
        urgency: payload
            .urgency
            .as_deref()
            .map(|raw| parse_text::<Urgency>(raw, URGENCY))
            .transpose()?
            .unwrap_or_default(),
        scheduled_at: parse_optional_rfc3339_timestamp(payload.scheduled_at.as_deref(), SCHEDULED_AT)?,
        completed_at: parse_optional_rfc3339_timestamp(payload.completed_at.as_deref(), COMPLETED_AT)?,
    })
}

fn parse_user(raw: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(raw, field).map(UserId::from_uuid)
}

async fn list_by(
    state: &HttpState,
    filter: DonationFilter,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let donations = state.donations_query.find_donations(&filter).await?;
    Ok(web::Json(
        donations.into_iter().map(DonationResponse::from).collect(),
    ))
}

/// Path carrying a donation identifier.
#[derive(Debug, Deserialize)]
pub struct DonationPath {
    id: String,
}

/// Path carrying a user identifier.
#[derive(Debug, Deserialize)]
pub struct PartyPath {
    id: String,
}

/// Path carrying a blood group.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodGroupPath {
    blood_group: String,
}

/// Path carrying a donation status.
#[derive(Debug, Deserialize)]
pub struct StatusPath {
    status: String,
}

/// Path carrying an urgency.
#[derive(Debug, Deserialize)]
pub struct UrgencyPath {
    urgency: String,
}

/// Record a donation request.
#[utoipa::path(
    post,
    path = "/api/v1/donations",
    request_body = DonationRequest,
    responses(
        (status = 201, description = "Donation recorded", body = DonationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "createDonation"
)]
#[post("/donations")]
pub async fn create_donation(
    state: web::Data<HttpState>,
    payload: web::Json<DonationRequest>,
) -> ApiResult<HttpResponse> {
    let details = parse_donation_request(payload.into_inner())?;
    let donation = state.donations.create_donation(details).await?;
    Ok(HttpResponse::Created().json(DonationResponse::from(donation)))
}

/// List every donation.
#[utoipa::path(
    get,
    path = "/api/v1/donations",
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "listDonations"
)]
#[get("/donations")]
pub async fn list_donations(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    list_by(&state, DonationFilter::All).await
}

/// Critical donations that are still pending.
#[utoipa::path(
    get,
    path = "/api/v1/donations/critical",
    responses(
        (status = 200, description = "Critical pending donations", body = [DonationResponse])
    ),
    tags = ["donations"],
    operation_id = "listCriticalDonations"
)]
#[get("/donations/critical")]
pub async fn list_critical_donations(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    list_by(&state, DonationFilter::CriticalPending).await
}

/// Fetch one donation.
#[utoipa::path(
    get,
    path = "/api/v1/donations/{id}",
    params(("id" = String, Path, description = "Donation identifier")),
    responses(
        (status = 200, description = "Donation", body = DonationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "getDonation"
)]
#[get("/donations/{id}")]
pub async fn get_donation(
    state: web::Data<HttpState>,
    path: web::Path<DonationPath>,
) -> ApiResult<web::Json<DonationResponse>> {
    let id = DonationId::from_uuid(parse_uuid(&path.id, ID)?);
    let donation = state.donations_query.get_donation(&id).await?;
    Ok(web::Json(DonationResponse::from(donation)))
}

/// Replace the editable fields of a donation.
#[utoipa::path(
    put,
    path = "/api/v1/donations/{id}",
    params(("id" = String, Path, description = "Donation identifier")),
    request_body = DonationRequest,
    responses(
        (status = 200, description = "Donation updated", body = DonationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "updateDonation"
)]
#[put("/donations/{id}")]
pub async fn update_donation(
    state: web::Data<HttpState>,
    path: web::Path<DonationPath>,
    payload: web::Json<DonationRequest>,
) -> ApiResult<web::Json<DonationResponse>> {
    let id = DonationId::from_uuid(parse_uuid(&path.id, ID)?);
    let details = parse_donation_request(payload.into_inner())?;
    let donation = state.donations.update_donation(&id, details).await?;
    Ok(web::Json(DonationResponse::from(donation)))
}

/// Remove a donation.
#[utoipa::path(
    delete,
    path = "/api/v1/donations/{id}",
    params(("id" = String, Path, description = "Donation identifier")),
    responses(
        (status = 204, description = "Donation deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "deleteDonation"
)]
#[delete("/donations/{id}")]
pub async fn delete_donation(
    state: web::Data<HttpState>,
    path: web::Path<DonationPath>,
) -> ApiResult<HttpResponse> {
    let id = DonationId::from_uuid(parse_uuid(&path.id, ID)?);
    state.donations.delete_donation(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Donations given by a donor.
#[utoipa::path(
    get,
    path = "/api/v1/donations/donor/{id}",
    params(("id" = String, Path, description = "Donor identifier")),
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "listDonationsByDonor"
)]
#[get("/donations/donor/{id}")]
pub async fn list_donations_by_donor(
    state: web::Data<HttpState>,
    path: web::Path<PartyPath>,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let donor = parse_user(&path.id, DONOR_ID)?;
    list_by(&state, DonationFilter::Donor(donor)).await
}

/// Donations requested by a seeker.
#[utoipa::path(
    get,
    path = "/api/v1/donations/seeker/{id}",
    params(("id" = String, Path, description = "Seeker identifier")),
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "listDonationsBySeeker"
)]
#[get("/donations/seeker/{id}")]
pub async fn list_donations_by_seeker(
    state: web::Data<HttpState>,
    path: web::Path<PartyPath>,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let seeker = parse_user(&path.id, SEEKER_ID)?;
    list_by(&state, DonationFilter::Seeker(seeker)).await
}

/// Donations where the user is donor or seeker.
#[utoipa::path(
    get,
    path = "/api/v1/donations/user/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "listDonationsByUser"
)]
#[get("/donations/user/{id}")]
pub async fn list_donations_by_user(
    state: web::Data<HttpState>,
    path: web::Path<PartyPath>,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let user = parse_user(&path.id, USER_ID)?;
    list_by(&state, DonationFilter::Party(user)).await
}

/// Donations of exactly this blood group.
#[utoipa::path(
    get,
    path = "/api/v1/donations/blood-group/{bloodGroup}",
    params(("bloodGroup" = String, Path, description = "Blood group, compared exactly")),
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "listDonationsByBloodGroup"
)]
#[get("/donations/blood-group/{bloodGroup}")]
pub async fn list_donations_by_blood_group(
    state: web::Data<HttpState>,
    path: web::Path<BloodGroupPath>,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let blood_group = parse_blood_group(&path.blood_group)?;
    list_by(&state, DonationFilter::BloodGroup(blood_group)).await
}

/// Donations in a lifecycle state.
#[utoipa::path(
    get,
    path = "/api/v1/donations/status/{status}",
    params(("status" = String, Path, description = "pending, completed or cancelled")),
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "listDonationsByStatus"
)]
#[get("/donations/status/{status}")]
pub async fn list_donations_by_status(
    state: web::Data<HttpState>,
    path: web::Path<StatusPath>,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let status = parse_text::<DonationStatus>(&path.status, STATUS)?;
    list_by(&state, DonationFilter::Status(status)).await
}

/// Donations of one urgency.
#[utoipa::path(
    get,
    path = "/api/v1/donations/urgency/{urgency}",
    params(("urgency" = String, Path, description = "critical or normal")),
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "listDonationsByUrgency"
)]
#[get("/donations/urgency/{urgency}")]
pub async fn list_donations_by_urgency(
    state: web::Data<HttpState>,
    path: web::Path<UrgencyPath>,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let urgency = parse_text::<Urgency>(&path.urgency, URGENCY)?;
    list_by(&state, DonationFilter::Urgency(urgency)).await
}

/// Register every donation route. Fixed segments come before `{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_donation)
        .service(list_donations)
        .service(list_critical_donations)
        .service(list_donations_by_donor)
        .service(list_donations_by_seeker)
        .service(list_donations_by_user)
        .service(list_donations_by_blood_group)
        .service(list_donations_by_status)
        .service(list_donations_by_urgency)
        .service(get_donation)
        .service(update_donation)
        .service(delete_donation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{donation_details, timestamp};
    use crate::inbound::http::test_utils::{MockPorts, send};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn request_body() -> Value {
        json!({
            "donorId": UserId::random().to_string(),
            "bloodGroup": "AB-",
            "amountMl": 450,
            "donationType": "platelets",
            "location": "York",
        })
    }

    #[actix_web::test]
    async fn create_applies_status_and_urgency_defaults() {
        let mut ports = MockPorts::default();
        ports
            .donations
            .expect_create_donation()
            .withf(|details| {
                details.status == DonationStatus::Pending
                    && details.urgency == Urgency::Normal
                    && details.donation_type == DonationType::Platelets
                    && details.seeker_id.is_none()
                    && details.amount_ml == Some(450)
            })
            .times(1)
            .returning(|details| Ok(Donation::record(DonationId::random(), details, timestamp(0))));

        let (status, body) = send(
            ports,
            actix_test::TestRequest::post()
                .uri("/api/v1/donations")
                .set_json(request_body()),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["urgency"], "normal");
        assert_eq!(body["donationType"], "platelets");
        assert!(body["seekerId"].is_null());
    }

    #[rstest]
    #[case("amountMl", json!(-1), "amountMl")]
    #[case("donationType", json!("blood"), "donationType")]
    #[case("status", json!("done"), "status")]
    #[case("urgency", json!("asap"), "urgency")]
    #[case("seekerId", json!("42"), "seekerId")]
    #[case("scheduledAt", json!("tomorrow"), "scheduledAt")]
    #[actix_web::test]
    async fn create_rejects_invalid_fields(
        #[case] key: &str,
        #[case] value: Value,
        #[case] field: &str,
    ) {
        let mut body = request_body();
        body[key] = value;

        let (status, error) = send(
            MockPorts::default(),
            actix_test::TestRequest::post()
                .uri("/api/v1/donations")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["details"]["field"], field);
    }

    #[actix_web::test]
    async fn critical_route_is_not_taken_for_an_id() {
        let mut ports = MockPorts::default();
        ports
            .donations_query
            .expect_find_donations()
            .withf(|filter| *filter == DonationFilter::CriticalPending)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let (status, _) = send(
            ports,
            actix_test::TestRequest::get().uri("/api/v1/donations/critical"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case("/api/v1/donations/status/COMPLETED", DonationFilter::Status(DonationStatus::Completed))]
    #[case("/api/v1/donations/urgency/critical", DonationFilter::Urgency(Urgency::Critical))]
    #[actix_web::test]
    async fn enum_routes_parse_their_segment(#[case] uri: &str, #[case] expected: DonationFilter) {
        let mut ports = MockPorts::default();
        ports
            .donations_query
            .expect_find_donations()
            .withf(move |filter| *filter == expected)
            .times(1)
            .returning(|_| Ok(vec![]));

        let (status, body) = send(ports, actix_test::TestRequest::get().uri(uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn unknown_status_is_rejected() {
        let (status, body) = send(
            MockPorts::default(),
            actix_test::TestRequest::get().uri("/api/v1/donations/status/lost"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "donation status must be pending, completed or cancelled"
        );
    }

    #[actix_web::test]
    async fn user_route_selects_either_party() {
        let user = UserId::random();
        let mut ports = MockPorts::default();
        ports
            .donations_query
            .expect_find_donations()
            .withf(move |filter| *filter == DonationFilter::Party(user))
            .times(1)
            .returning(move |_| {
                Ok(vec![Donation::record(
                    DonationId::random(),
                    donation_details(None, Some(user)),
                    timestamp(0),
                )])
            });

        let uri = format!("/api/v1/donations/user/{user}");
        let (status, body) = send(ports, actix_test::TestRequest::get().uri(&uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["seekerId"], user.to_string());
    }

    #[actix_web::test]
    async fn delete_of_a_missing_donation_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .donations
            .expect_delete_donation()
            .returning(|_| Err(Error::not_found("Donation not found")));

        let uri = format!("/api/v1/donations/{}", DonationId::random());
        let (status, body) = send(ports, actix_test::TestRequest::delete().uri(&uri)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Donation not found");
    }
}

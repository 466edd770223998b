//! Match store HTTP handlers, including automatic matching.
//!
//! ```text
//! POST /api/v1/matches/auto-match/O+
//! GET /api/v1/matches/high-compatibility?minScore=90
//! GET /api/v1/matches/find/O+/leeds
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::MatchFilter;
use crate::domain::{
    AutoMatchOutcome, CompatibilityScore, Distance, Error, Match, MatchDetails, MatchId,
    MatchStatus, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::parse_blood_group;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_optional_uuid, parse_text, parse_uuid,
};

const ID: FieldName = FieldName::new("id");
const DONOR_ID: FieldName = FieldName::new("donorId");
const SEEKER_ID: FieldName = FieldName::new("seekerId");
const USER_ID: FieldName = FieldName::new("userId");
const DISTANCE: FieldName = FieldName::new("distance");
const COMPATIBILITY_SCORE: FieldName = FieldName::new("compatibilityScore");
const MIN_SCORE: FieldName = FieldName::new("minScore");
const STATUS: FieldName = FieldName::new("status");

/// Threshold used by `/matches/high-compatibility` without `minScore`.
pub const DEFAULT_HIGH_COMPATIBILITY: i64 = 80;

/// Payload for storing or editing a match.
///
/// Donor and seeker are only read on creation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[schema(format = "uuid")]
    pub donor_id: Option<String>,
    #[schema(format = "uuid")]
    pub seeker_id: Option<String>,
    pub blood_group: String,
    #[schema(minimum = 0)]
    pub distance: f64,
    #[schema(minimum = 0, maximum = 100)]
    pub compatibility_score: i64,
    #[schema(example = "pending")]
    pub status: Option<String>,
}

/// Match as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub donor_id: Option<String>,
    #[schema(format = "uuid")]
    pub seeker_id: Option<String>,
    pub blood_group: String,
    pub distance: f64,
    pub compatibility_score: u8,
    pub status: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Match> for MatchResponse {
    fn from(record: Match) -> Self {
        let details = record.details();
        Self {
            id: record.id().to_string(),
            donor_id: details.donor_id.map(|id| id.to_string()),
            seeker_id: details.seeker_id.map(|id| id.to_string()),
            blood_group: details.blood_group.as_str().to_owned(),
            distance: details.distance.value(),
            compatibility_score: details.compatibility_score.value(),
            status: details.status.as_str().to_owned(),
            created_at: record.created_at().to_rfc3339(),
            updated_at: record.updated_at().to_rfc3339(),
        }
    }
}

/// Summary returned by `POST /matches/auto-match/{bloodGroup}`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoMatchResponse {
    pub message: String,
    pub blood_group: String,
    pub evaluated_pairs: usize,
    pub created_matches: usize,
}

impl From<AutoMatchOutcome> for AutoMatchResponse {
    fn from(outcome: AutoMatchOutcome) -> Self {
        let blood_group = String::from(outcome.blood_group);
        Self {
            message: format!("Automatic matches created for blood group: {blood_group}"),
            blood_group,
            evaluated_pairs: outcome.evaluated_pairs,
            created_matches: outcome.created_matches,
        }
    }
}

fn parse_score(raw: i64, field: FieldName) -> Result<CompatibilityScore, Error> {
    CompatibilityScore::new(raw).map_err(|err| invalid_value_error(field, err, Some(&raw.to_string())))
}

fn parse_match_request(payload: MatchRequest) -> Result<MatchDetails, Error> {
    Ok(MatchDetails {
        donor_id: parse_optional_uuid(payload.donor_id.as_deref(), DONOR_ID)?
            .map(UserId::from_uuid),
        seeker_id: parse_optional_uuid(payload.seeker_id.as_deref(), SEEKER_ID)?
            .map(UserId::from_uuid),
        blood_group: parse_blood_group(&payload.blood_group)?,
        distance: Distance::new(payload.distance).map_err(|err| {
            invalid_value_error(DISTANCE, err, Some(&payload.distance.to_string()))
        })?,
        compatibility_score: parse_score(payload.compatibility_score, COMPATIBILITY_SCORE)?,
        status: payload
            .status
            .as_deref()
            .map(|raw| parse_text::<MatchStatus>(raw, STATUS))
            .transpose()?
            .unwrap_or_default(),
    })
}

fn parse_match_id(raw: &str) -> Result<MatchId, Error> {
    parse_uuid(raw, ID).map(MatchId::from_uuid)
}

fn parse_user(raw: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(raw, field).map(UserId::from_uuid)
}

fn to_responses(matches: Vec<Match>) -> Vec<MatchResponse> {
    matches.into_iter().map(MatchResponse::from).collect()
}

async fn list_by(state: &HttpState, filter: MatchFilter) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    let matches = state.matches_query.find_matches(&filter).await?;
    Ok(web::Json(to_responses(matches)))
}

/// Path carrying a match identifier.
#[derive(Debug, Deserialize)]
pub struct MatchPath {
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

/// Path carrying a match status.
#[derive(Debug, Deserialize)]
pub struct StatusPath {
    status: String,
}

/// Path carrying a blood group and a location needle.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialMatchPath {
    blood_group: String,
    location: String,
}

/// Query string for `/matches/high-compatibility`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct HighCompatibilityQuery {
    /// Lowest score to include, defaulting to 80.
    min_score: Option<i64>,
}

/// Store a match supplied by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/matches",
    request_body = MatchRequest,
    responses(
        (status = 201, description = "Match stored", body = MatchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "createMatch"
)]
#[post("/matches")]
pub async fn create_match(
    state: web::Data<HttpState>,
    payload: web::Json<MatchRequest>,
) -> ApiResult<HttpResponse> {
    let details = parse_match_request(payload.into_inner())?;
    let record = state.matches.create_match(details).await?;
    Ok(HttpResponse::Created().json(MatchResponse::from(record)))
}

/// List every match.
#[utoipa::path(
    get,
    path = "/api/v1/matches",
    responses(
        (status = 200, description = "Matches", body = [MatchResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "listMatches"
)]
#[get("/matches")]
pub async fn list_matches(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    list_by(&state, MatchFilter::All).await
}

/// Matches scoring at least `minScore`, best first.
#[utoipa::path(
    get,
    path = "/api/v1/matches/high-compatibility",
    params(HighCompatibilityQuery),
    responses(
        (status = 200, description = "Matches ordered by score", body = [MatchResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "listHighCompatibilityMatches"
)]
#[get("/matches/high-compatibility")]
pub async fn list_high_compatibility_matches(
    state: web::Data<HttpState>,
    query: web::Query<HighCompatibilityQuery>,
) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    let threshold = parse_score(
        query.min_score.unwrap_or(DEFAULT_HIGH_COMPATIBILITY),
        MIN_SCORE,
    )?;
    list_by(&state, MatchFilter::MinScore(threshold)).await
}

/// Fetch one match.
#[utoipa::path(
    get,
    path = "/api/v1/matches/{id}",
    params(("id" = String, Path, description = "Match identifier")),
    responses(
        (status = 200, description = "Match", body = MatchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "getMatch"
)]
#[get("/matches/{id}")]
pub async fn get_match(
    state: web::Data<HttpState>,
    path: web::Path<MatchPath>,
) -> ApiResult<web::Json<MatchResponse>> {
    let id = parse_match_id(&path.id)?;
    let record = state.matches_query.get_match(&id).await?;
    Ok(web::Json(MatchResponse::from(record)))
}

/// Replace blood group, distance, score and status of a match.
#[utoipa::path(
    put,
    path = "/api/v1/matches/{id}",
    params(("id" = String, Path, description = "Match identifier")),
    request_body = MatchRequest,
    responses(
        (status = 200, description = "Match updated", body = MatchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "updateMatch"
)]
#[put("/matches/{id}")]
pub async fn update_match(
    state: web::Data<HttpState>,
    path: web::Path<MatchPath>,
    payload: web::Json<MatchRequest>,
) -> ApiResult<web::Json<MatchResponse>> {
    let id = parse_match_id(&path.id)?;
    let details = parse_match_request(payload.into_inner())?;
    let record = state.matches.update_match(&id, details).await?;
    Ok(web::Json(MatchResponse::from(record)))
}

/// Remove a match.
#[utoipa::path(
    delete,
    path = "/api/v1/matches/{id}",
    params(("id" = String, Path, description = "Match identifier")),
    responses(
        (status = 204, description = "Match deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "deleteMatch"
)]
#[delete("/matches/{id}")]
pub async fn delete_match(
    state: web::Data<HttpState>,
    path: web::Path<MatchPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_match_id(&path.id)?;
    state.matches.delete_match(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Matches offered to a donor.
#[utoipa::path(
    get,
    path = "/api/v1/matches/donor/{id}",
    params(("id" = String, Path, description = "Donor identifier")),
    responses(
        (status = 200, description = "Matches", body = [MatchResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "listMatchesByDonor"
)]
#[get("/matches/donor/{id}")]
pub async fn list_matches_by_donor(
    state: web::Data<HttpState>,
    path: web::Path<PartyPath>,
) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    let donor = parse_user(&path.id, DONOR_ID)?;
    list_by(&state, MatchFilter::Donor(donor)).await
}

/// Matches offered to a seeker.
#[utoipa::path(
    get,
    path = "/api/v1/matches/seeker/{id}",
    params(("id" = String, Path, description = "Seeker identifier")),
    responses(
        (status = 200, description = "Matches", body = [MatchResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "listMatchesBySeeker"
)]
#[get("/matches/seeker/{id}")]
pub async fn list_matches_by_seeker(
    state: web::Data<HttpState>,
    path: web::Path<PartyPath>,
) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    let seeker = parse_user(&path.id, SEEKER_ID)?;
    list_by(&state, MatchFilter::Seeker(seeker)).await
}

/// Matches where the user is donor or seeker.
#[utoipa::path(
    get,
    path = "/api/v1/matches/user/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Matches", body = [MatchResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "listMatchesByUser"
)]
#[get("/matches/user/{id}")]
pub async fn list_matches_by_user(
    state: web::Data<HttpState>,
    path: web::Path<PartyPath>,
) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    let user = parse_user(&path.id, USER_ID)?;
    list_by(&state, MatchFilter::Party(user)).await
}

/// Matches of exactly this blood group.
#[utoipa::path(
    get,
    path = "/api/v1/matches/blood-group/{bloodGroup}",
    params(("bloodGroup" = String, Path, description = "Blood group, compared exactly")),
    responses(
        (status = 200, description = "Matches", body = [MatchResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "listMatchesByBloodGroup"
)]
#[get("/matches/blood-group/{bloodGroup}")]
pub async fn list_matches_by_blood_group(
    state: web::Data<HttpState>,
    path: web::Path<BloodGroupPath>,
) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    let blood_group = parse_blood_group(&path.blood_group)?;
    list_by(&state, MatchFilter::BloodGroup(blood_group)).await
}

/// Matches in a lifecycle state.
#[utoipa::path(
    get,
    path = "/api/v1/matches/status/{status}",
    params(("status" = String, Path, description = "pending, accepted or declined")),
    responses(
        (status = 200, description = "Matches", body = [MatchResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "listMatchesByStatus"
)]
#[get("/matches/status/{status}")]
pub async fn list_matches_by_status(
    state: web::Data<HttpState>,
    path: web::Path<StatusPath>,
) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    let status = parse_text::<MatchStatus>(&path.status, STATUS)?;
    list_by(&state, MatchFilter::Status(status)).await
}

/// Pending matches whose donor and seeker both sit in `location`.
///
/// The blood group segment is validated but does not narrow the result.
#[utoipa::path(
    get,
    path = "/api/v1/matches/find/{bloodGroup}/{location}",
    params(
        ("bloodGroup" = String, Path, description = "Blood group; accepted but not used for filtering"),
        ("location" = String, Path, description = "Case-insensitive location substring")
    ),
    responses(
        (status = 200, description = "Potential matches", body = [MatchResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "findPotentialMatches"
)]
#[get("/matches/find/{bloodGroup}/{location}")]
pub async fn find_potential_matches(
    state: web::Data<HttpState>,
    path: web::Path<PotentialMatchPath>,
) -> ApiResult<web::Json<Vec<MatchResponse>>> {
    let blood_group = parse_blood_group(&path.blood_group)?;
    let matches = state
        .matches_query
        .find_potential_matches(&blood_group, &path.location)
        .await?;
    Ok(web::Json(to_responses(matches)))
}

/// Pair available donors and seekers of a blood group.
///
/// Any failure is reported as a generic `invalid_request`; the cause is
/// logged with the request's trace id.
#[utoipa::path(
    post,
    path = "/api/v1/matches/auto-match/{bloodGroup}",
    params(("bloodGroup" = String, Path, description = "Blood group to match")),
    responses(
        (status = 200, description = "Matching run completed", body = AutoMatchResponse),
        (status = 400, description = "Failed to create automatic matches", body = ErrorSchema)
    ),
    tags = ["matches"],
    operation_id = "createAutomaticMatches"
)]
#[post("/matches/auto-match/{bloodGroup}")]
pub async fn create_automatic_matches(
    state: web::Data<HttpState>,
    path: web::Path<BloodGroupPath>,
) -> ApiResult<web::Json<AutoMatchResponse>> {
    let blood_group = parse_blood_group(&path.blood_group)?;
    let outcome = state
        .matches
        .create_automatic_matches(&blood_group)
        .await
        .map_err(|err| {
            warn!(
                blood_group = %blood_group,
                code = ?err.code(),
                message = err.message(),
                "automatic matching failed"
            );
            Error::invalid_request("Failed to create automatic matches")
        })?;
    Ok(web::Json(AutoMatchResponse::from(outcome)))
}

/// Register every match route. Fixed segments come before `{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_match)
        .service(list_matches)
        .service(list_high_compatibility_matches)
        .service(create_automatic_matches)
        .service(find_potential_matches)
        .service(list_matches_by_donor)
        .service(list_matches_by_seeker)
        .service(list_matches_by_user)
        .service(list_matches_by_blood_group)
        .service(list_matches_by_status)
        .service(get_match)
        .service(update_match)
        .service(delete_match);
}

#[cfg(test)]
#[path = "matches_tests.rs"]
mod tests;

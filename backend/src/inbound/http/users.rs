//! User directory HTTP handlers.
//!
//! ```text
//! POST /api/v1/users
//! GET /api/v1/users/blood-group/O+/donor
//! GET /api/v1/users/location/leeds/seeker
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::UserFilter;
use crate::domain::{
    Age, BloodGroup, Email, Error, Location, PersonName, User, UserId, UserProfile, UserRole,
    Weight, normalise_optional_text,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_optional_rfc3339_timestamp, parse_text, parse_uuid,
};

const ID: FieldName = FieldName::new("id");
const NAME: FieldName = FieldName::new("name");
const EMAIL: FieldName = FieldName::new("email");
const BLOOD_GROUP: FieldName = FieldName::new("bloodGroup");
const LOCATION: FieldName = FieldName::new("location");
const AGE: FieldName = FieldName::new("age");
const WEIGHT: FieldName = FieldName::new("weight");
const ROLE: FieldName = FieldName::new("role");
const LAST_DONATION: FieldName = FieldName::new("lastDonation");

fn default_available() -> bool {
    true
}

/// Registration and update payload for a donor or seeker.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub name: String,
    #[schema(format = "email")]
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "O+")]
    pub blood_group: String,
    pub location: String,
    #[schema(minimum = 18, maximum = 65)]
    pub age: i64,
    #[schema(minimum = 45)]
    pub weight: Option<f64>,
    #[schema(example = "donor")]
    pub role: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[schema(format = "date-time")]
    pub last_donation: Option<String>,
    pub medical_conditions: Option<String>,
    pub emergency_contact: Option<String>,
}

/// User record as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub blood_group: String,
    pub location: String,
    pub age: u8,
    pub weight: Option<f64>,
    pub role: String,
    pub is_available: bool,
    #[schema(format = "date-time")]
    pub last_donation: Option<String>,
    pub medical_conditions: Option<String>,
    pub emergency_contact: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let profile = user.profile();
        Self {
            id: user.id().to_string(),
            name: profile.name.as_str().to_owned(),
            email: profile.email.as_str().to_owned(),
            phone: profile.phone.clone(),
            blood_group: profile.blood_group.as_str().to_owned(),
            location: profile.location.as_str().to_owned(),
            age: profile.age.years(),
            weight: profile.weight.map(Weight::kilograms),
            role: profile.role.as_str().to_owned(),
            is_available: profile.is_available,
            last_donation: profile.last_donation.map(|at| at.to_rfc3339()),
            medical_conditions: profile.medical_conditions.clone(),
            emergency_contact: profile.emergency_contact.clone(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

fn parse_user_request(payload: UserRequest) -> Result<UserProfile, Error> {
    let name = PersonName::new(&payload.name)
        .map_err(|err| invalid_value_error(NAME, err, Some(&payload.name)))?;
    let email = parse_email(&payload.email)?;
    let blood_group = parse_blood_group(&payload.blood_group)?;
    let location = Location::new(&payload.location)
        .map_err(|err| invalid_value_error(LOCATION, err, Some(&payload.location)))?;
    let age = Age::new(payload.age)
        .map_err(|err| invalid_value_error(AGE, err, Some(&payload.age.to_string())))?;
    let weight = payload
        .weight
        .map(|kilograms| {
            Weight::new(kilograms)
                .map_err(|err| invalid_value_error(WEIGHT, err, Some(&kilograms.to_string())))
        })
        .transpose()?;
    let role = parse_text::<UserRole>(&payload.role, ROLE)?;
    let last_donation =
        parse_optional_rfc3339_timestamp(payload.last_donation.as_deref(), LAST_DONATION)?;

    Ok(UserProfile {
        name,
        email,
        phone: normalise_optional_text(payload.phone),
        blood_group,
        location,
        age,
        weight,
        role,
        is_available: payload.is_available,
        last_donation,
        medical_conditions: normalise_optional_text(payload.medical_conditions),
        emergency_contact: normalise_optional_text(payload.emergency_contact),
    })
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    parse_uuid(raw, ID).map(UserId::from_uuid)
}

fn parse_email(raw: &str) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| invalid_value_error(EMAIL, err, Some(raw)))
}

pub(crate) fn parse_blood_group(raw: &str) -> Result<BloodGroup, Error> {
    BloodGroup::new(raw).map_err(|err| invalid_value_error(BLOOD_GROUP, err, Some(raw)))
}

fn to_responses(users: Vec<User>) -> Vec<UserResponse> {
    users.into_iter().map(UserResponse::from).collect()
}

async fn list_by(state: &HttpState, filter: UserFilter) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users_query.find_users(&filter).await?;
    Ok(web::Json(to_responses(users)))
}

/// Path carrying a user identifier.
#[derive(Debug, Deserialize)]
pub struct UserPath {
    id: String,
}

/// Path carrying an email address.
#[derive(Debug, Deserialize)]
pub struct EmailPath {
    email: String,
}

/// Path carrying a blood group.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodGroupPath {
    blood_group: String,
}

/// Path carrying a blood group and a role.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodGroupRolePath {
    blood_group: String,
    role: String,
}

/// Path carrying a location needle and a role.
#[derive(Debug, Deserialize)]
pub struct LocationRolePath {
    location: String,
    role: String,
}

/// Register a donor or seeker.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already exists", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let profile = parse_user_request(payload.into_inner())?;
    let user = state.users.create_user(profile).await?;
    info!(user_id = %user.id(), "user registered over http");
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// List every user in registration order.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    list_by(&state, UserFilter::All).await
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(&path.id)?;
    let user = state.users_query.get_user(&id).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Replace a user's profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email already exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(&path.id)?;
    let profile = parse_user_request(payload.into_inner())?;
    let user = state.users.update_user(&id, profile).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Remove a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.id)?;
    state.users.delete_user(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Fetch one user by email address.
#[utoipa::path(
    get,
    path = "/api/v1/users/email/{email}",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserByEmail"
)]
#[get("/users/email/{email}")]
pub async fn get_user_by_email(
    state: web::Data<HttpState>,
    path: web::Path<EmailPath>,
) -> ApiResult<web::Json<UserResponse>> {
    let email = parse_email(&path.email)?;
    let user = state.users_query.get_user_by_email(&email).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Available users of a role with exactly this blood group.
#[utoipa::path(
    get,
    path = "/api/v1/users/blood-group/{bloodGroup}/{role}",
    params(
        ("bloodGroup" = String, Path, description = "Blood group, compared exactly"),
        ("role" = String, Path, description = "donor or seeker")
    ),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsersByBloodGroup"
)]
#[get("/users/blood-group/{bloodGroup}/{role}")]
pub async fn list_users_by_blood_group(
    state: web::Data<HttpState>,
    path: web::Path<BloodGroupRolePath>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let filter = UserFilter::AvailableByBloodGroup {
        blood_group: parse_blood_group(&path.blood_group)?,
        role: parse_text(&path.role, ROLE)?,
    };
    list_by(&state, filter).await
}

/// Available users of a role whose location contains the needle.
#[utoipa::path(
    get,
    path = "/api/v1/users/location/{location}/{role}",
    params(
        ("location" = String, Path, description = "Case-insensitive location substring"),
        ("role" = String, Path, description = "donor or seeker")
    ),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsersByLocation"
)]
#[get("/users/location/{location}/{role}")]
pub async fn list_users_by_location(
    state: web::Data<HttpState>,
    path: web::Path<LocationRolePath>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let LocationRolePath { location, role } = path.into_inner();
    let filter = UserFilter::AvailableByLocation {
        role: parse_text(&role, ROLE)?,
        location,
    };
    list_by(&state, filter).await
}

/// Available donors of a blood group.
#[utoipa::path(
    get,
    path = "/api/v1/users/donors/{bloodGroup}",
    params(("bloodGroup" = String, Path, description = "Blood group, compared exactly")),
    responses(
        (status = 200, description = "Donors", body = [UserResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listAvailableDonors"
)]
#[get("/users/donors/{bloodGroup}")]
pub async fn list_available_donors(
    state: web::Data<HttpState>,
    path: web::Path<BloodGroupPath>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let filter = UserFilter::AvailableByBloodGroup {
        blood_group: parse_blood_group(&path.blood_group)?,
        role: UserRole::Donor,
    };
    list_by(&state, filter).await
}

/// Available seekers of a blood group.
#[utoipa::path(
    get,
    path = "/api/v1/users/seekers/{bloodGroup}",
    params(("bloodGroup" = String, Path, description = "Blood group, compared exactly")),
    responses(
        (status = 200, description = "Seekers", body = [UserResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listAvailableSeekers"
)]
#[get("/users/seekers/{bloodGroup}")]
pub async fn list_available_seekers(
    state: web::Data<HttpState>,
    path: web::Path<BloodGroupPath>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let filter = UserFilter::AvailableByBloodGroup {
        blood_group: parse_blood_group(&path.blood_group)?,
        role: UserRole::Seeker,
    };
    list_by(&state, filter).await
}

/// Register every user route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(get_user_by_email)
        .service(list_users_by_blood_group)
        .service(list_users_by_location)
        .service(list_available_donors)
        .service(list_available_seekers)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}

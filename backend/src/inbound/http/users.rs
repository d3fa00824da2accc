//! Account API handlers.
//!
//! ```text
//! POST /register {"name":"Ann","email":"ann@x.com","password":"secret1","confirm_password":"secret1"}
//! POST /login {"email":"ann@x.com","password":"secret1"}
//! GET /me
//! PUT /me {"language":"French"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{
    AccountValidationError, Error, LoginCredentials, Profile, ProfileUpdate, ProfileUpdateParts,
    Registration,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::validation_error;

/// Request body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name, 1 to 50 characters once trimmed.
    #[schema(example = "Ann")]
    pub name: String,
    /// Login email; stored lowercased.
    #[schema(example = "ann@x.com")]
    pub email: String,
    /// Plain-text password, 6 to 128 characters.
    #[schema(example = "secret1")]
    pub password: String,
    /// Must equal `password`.
    #[schema(example = "secret1")]
    pub confirm_password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = AccountValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.name,
            &value.email,
            &value.password,
            &value.confirm_password,
        )
    }
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Registered email, matched case-insensitively.
    #[schema(example = "ann@x.com")]
    pub email: String,
    /// Plain-text password.
    #[schema(example = "secret1")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = AccountValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Token returned by `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `bearer`.
    #[schema(example = "bearer")]
    pub token_type: String,
}

/// Request body for `PUT /me`.
///
/// Absent, `null` and blank fields all leave the stored value unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// Replacement display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement password.
    #[serde(default)]
    pub new_password: Option<String>,
    /// One of the age group labels.
    #[serde(default)]
    #[schema(example = "25-34")]
    pub age_group: Option<String>,
    /// One of the gender labels.
    #[serde(default)]
    pub gender: Option<String>,
    /// One of the language labels.
    #[serde(default)]
    #[schema(example = "French")]
    pub language: Option<String>,
}

impl TryFrom<&UpdateProfileRequest> for ProfileUpdate {
    type Error = AccountValidationError;

    fn try_from(value: &UpdateProfileRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(ProfileUpdateParts {
            name: value.name.as_deref(),
            new_password: value.new_password.as_deref(),
            age_group: value.age_group.as_deref(),
            gender: value.gender.as_deref(),
            language: value.language.as_deref(),
        })
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Profile),
        (status = 400, description = "Invalid request or email already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner()).map_err(|err| {
        debug!(field = err.field(), "registration rejected");
        validation_error(&err)
    })?;
    let profile = state.registration.register(registration).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid email or password", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(|err| validation_error(&err))?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(TokenResponse {
        access_token: token.into_inner(),
        token_type: "bearer".to_owned(),
    }))
}

/// Return the caller's profile.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Caller's profile", body = Profile),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("bearer" = []))
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<web::Json<Profile>> {
    let profile = state.profile.fetch_profile(token.as_str()).await?;
    Ok(web::Json(profile))
}

/// Apply a partial update to the caller's profile.
#[utoipa::path(
    put,
    path = "/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser",
    security(("bearer" = []))
)]
#[put("/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<Profile>> {
    let update =
        ProfileUpdate::try_from(&payload.into_inner()).map_err(|err| validation_error(&err))?;
    let profile = state
        .profile_updates
        .update_profile(token.as_str(), update)
        .await?;
    Ok(web::Json(profile))
}

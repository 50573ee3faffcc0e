/// Authentication endpoints
///
/// - `POST /auth/signup` - Create an account and get tokens
/// - `POST /auth/login` - Login and get tokens
/// - `POST /auth/refresh` - Exchange a refresh token for a new access token
///
/// Signup and login answer with:
///
/// ```json
/// {
///   "accessToken": "eyJ...",
///   "refreshToken": "eyJ...",
///   "user": { "id": 1, "username": "alice" }
/// }
/// ```

use crate::{app::AppState, error::ApiResult, extract::ApiJson};
use axum::{extract::State, Json};
use jemcrud_shared::auth::service::{self, AuthResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request
///
/// Missing username or password deserialize as empty and are rejected with
/// "Username and password are required".
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Username must be at most 255 characters"))]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Optional email, stored as given; an empty string counts as absent
    pub email: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(alias = "refresh_token")]
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Register a new user
///
/// # Errors
///
/// - `400 Bad Request`: Missing credentials, or username already exists
/// - `422 Unprocessable Entity`: Username longer than the column allows
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(mut req): ApiJson<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;
    req.email = req.email.filter(|e| !e.trim().is_empty());

    let response = service::signup(
        &state.db,
        &state.config.jwt,
        &req.username,
        &req.password,
        req.email.as_deref(),
    )
    .await?;

    Ok(Json(response))
}

/// Login with username and password
///
/// # Errors
///
/// - `400 Bad Request`: "Invalid Credentials" for an unknown user or a wrong
///   password
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response =
        service::login(&state.db, &state.config.jwt, &req.username, &req.password).await?;

    Ok(Json(response))
}

/// Refresh an access token
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or non-refresh token
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = service::refresh(&req.refresh_token, &state.config.jwt)?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Position CRUD endpoints
///
/// Every route here sits behind the JWT layer; the authenticated user is
/// recorded as `created_by` / `updated_by`.
///
/// # Endpoints
///
/// - `GET /positions` - List positions
/// - `GET /positions/:id` - Get one position
/// - `POST /positions` - Create a position
/// - `PATCH /positions/:id` - Update code and/or name
/// - `DELETE /positions/:id` - Delete a position
///
/// Request bodies accept `position_code` / `position_name` or the camelCase
/// `positionCode` / `positionName`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
};
use axum::{extract::State, http::StatusCode, Json};
use jemcrud_shared::{
    auth::middleware::AuthContext,
    models::position::{
        CreatePosition, Position, UpdatePosition, POSITION_CODE_MAX_LEN, POSITION_NAME_MAX_LEN,
    },
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Create position request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePositionRequest {
    #[serde(default, alias = "positionCode")]
    #[validate(length(
        min = 1,
        max = POSITION_CODE_MAX_LEN,
        message = "Position code must be 1-50 characters"
    ))]
    pub position_code: String,

    #[serde(default, alias = "positionName")]
    #[validate(length(
        min = 1,
        max = POSITION_NAME_MAX_LEN,
        message = "Position name must be 1-255 characters"
    ))]
    pub position_name: String,
}

/// Update position request; omitted fields keep their value
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePositionRequest {
    #[serde(default, alias = "positionCode")]
    #[validate(length(
        min = 1,
        max = POSITION_CODE_MAX_LEN,
        message = "Position code must be 1-50 characters"
    ))]
    pub position_code: Option<String>,

    #[serde(default, alias = "positionName")]
    #[validate(length(
        min = 1,
        max = POSITION_NAME_MAX_LEN,
        message = "Position name must be 1-255 characters"
    ))]
    pub position_name: Option<String>,
}

/// Plain confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Maps a write that references a deleted user to 401
///
/// An access token stays valid after its user is deleted; the audit foreign
/// key is what catches it.
fn stale_user(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return ApiError::Unauthorized("User not found".to_string());
        }
    }
    err.into()
}

/// List all positions
pub async fn list_positions(State(state): State<AppState>) -> ApiResult<Json<Vec<Position>>> {
    let positions = Position::list(&state.db).await?;
    Ok(Json(positions))
}

/// Get a position by ID
///
/// # Errors
///
/// - `404 Not Found`: "No Data found"
pub async fn get_position(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<Position>> {
    let position = Position::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No Data found".to_string()))?;

    Ok(Json(position))
}

/// Create a position
///
/// # Response
///
/// `201 Created` with the stored position.
///
/// # Errors
///
/// - `401 Unauthorized`: The token's user no longer exists
pub async fn create_position(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<CreatePositionRequest>,
) -> ApiResult<(StatusCode, Json<Position>)> {
    req.validate()?;

    let position = Position::create(
        &state.db,
        CreatePosition {
            position_code: req.position_code,
            position_name: req.position_name,
            created_by: Some(auth.user_id),
        },
    )
    .await
    .map_err(stale_user)?;

    info!(
        position_id = position.id,
        user_id = auth.user_id,
        "Position created"
    );

    Ok((StatusCode::CREATED, Json(position)))
}

/// Update a position's code and/or name
///
/// # Errors
///
/// - `401 Unauthorized`: The token's user no longer exists
/// - `404 Not Found`: "Position not found"
pub async fn update_position(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<UpdatePositionRequest>,
) -> ApiResult<Json<Position>> {
    req.validate()?;

    let position = Position::update(
        &state.db,
        id,
        UpdatePosition {
            position_code: req.position_code,
            position_name: req.position_name,
            updated_by: Some(auth.user_id),
        },
    )
    .await
    .map_err(stale_user)?
    .ok_or_else(|| ApiError::NotFound("Position not found".to_string()))?;

    info!(position_id = id, user_id = auth.user_id, "Position updated");

    Ok(Json(position))
}

/// Delete a position
///
/// # Errors
///
/// - `404 Not Found`: "Position not found"
pub async fn delete_position(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<MessageResponse>> {
    if !Position::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Position not found".to_string()));
    }

    info!(position_id = id, user_id = auth.user_id, "Position deleted");

    Ok(Json(MessageResponse {
        message: "Position deleted successfully".to_string(),
    }))
}

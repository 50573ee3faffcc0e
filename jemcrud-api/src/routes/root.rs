/// Welcome document
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Frontend shown when `FRONTEND_URL` is unset (the Vite dev server)
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Describes the server and lists its endpoints
pub async fn welcome(State(state): State<AppState>) -> Json<Value> {
    let frontend = state
        .config
        .api
        .frontend_url
        .as_deref()
        .unwrap_or(DEFAULT_FRONTEND_URL);

    Json(json!({
        "message": "JemCRUD API Server is running!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "auth": {
                "signup": "POST /auth/signup",
                "login": "POST /auth/login",
                "refresh": "POST /auth/refresh",
            },
            "positions": {
                "list": "GET /positions",
                "get": "GET /positions/:id",
                "create": "POST /positions",
                "update": "PATCH /positions/:id",
                "delete": "DELETE /positions/:id",
            },
        },
        "frontend": frontend,
        "documentation": "Positions endpoints require an 'Authorization: Bearer <accessToken>' header",
    }))
}

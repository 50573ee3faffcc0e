/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use jemcrud_api::{app::AppState, config::Config};
/// use jemcrud_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.database).await?;
/// let state = AppState::new(pool, config);
/// let app = jemcrud_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, request::Parts, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use jemcrud_shared::auth::middleware::AuthContext;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// When the server started, for the health endpoint's uptime
    pub started_at: Instant,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Gets the access-token secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.access_secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /                     # Welcome document (public)
/// ├── GET /health               # Health check (public)
/// ├── /auth/                    # Authentication (public)
/// │   ├── POST /signup
/// │   ├── POST /login
/// │   └── POST /refresh
/// └── /positions/               # Positions (authenticated)
///     ├── GET    /
///     ├── POST   /
///     ├── GET    /:id
///     ├── PATCH  /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (positions only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::root::welcome))
        .route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let position_routes = Router::new()
        .route(
            "/",
            get(routes::positions::list_positions).post(routes::positions::create_position),
        )
        .route(
            "/:id",
            get(routes::positions::get_position)
                .patch(routes::positions::update_position)
                .delete(routes::positions::delete_position),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = cors_layer(state.config.api.frontend_url.clone());

    Router::new()
        .merge(public_routes)
        .nest("/auth", auth_routes)
        .nest("/positions", position_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS for local dev servers, Vercel deployments, and `FRONTEND_URL`
fn cors_layer(frontend_url: Option<String>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .is_ok_and(|origin| is_allowed_origin(origin, frontend_url.as_deref()))
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Returns whether a browser origin may call the API
pub fn is_allowed_origin(origin: &str, frontend_url: Option<&str>) -> bool {
    if let Some(port) = origin.strip_prefix("http://localhost:") {
        return !port.is_empty() && port.chars().all(|c| c.is_ascii_digit());
    }

    if let Some(subdomain) = origin
        .strip_prefix("https://")
        .and_then(|host| host.strip_suffix(".vercel.app"))
    {
        if !subdomain.is_empty() && !subdomain.contains('/') {
            return true;
        }
    }

    frontend_url.is_some_and(|url| url.trim_end_matches('/') == origin)
}

/// JWT authentication middleware layer
///
/// Validates the access token from the Authorization header, then injects
/// `AuthContext` into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = AuthContext::from_headers(req.headers(), state.jwt_secret())?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

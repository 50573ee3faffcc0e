/// Common test utilities for integration tests
///
/// - Test database setup (skipped when `DATABASE_URL` is unset)
/// - Test user creation and access token
/// - Request helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use jemcrud_api::app::{build_router, AppState};
use jemcrud_api::config::Config;
use jemcrud_shared::auth::jwt::issue_token_pair;
use jemcrud_shared::db::{pool::create_pool, schema::initialize_tables};
use jemcrud_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a test context, or `None` when no test database is configured
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping integration test");
            return Ok(None);
        };

        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some(url.clone()),
            "DATABASE_MAX_CONNECTIONS" => Some("5".to_string()),
            "JWT_SECRET" => Some("integration-test-access-secret".to_string()),
            "JWT_REFRESH_SECRET" => Some("integration-test-refresh-secret".to_string()),
            _ => None,
        })?;

        let db = create_pool(&config.database).await?;
        initialize_tables(&db).await?;

        let user = User::create(
            &db,
            CreateUser {
                username: unique_username(),
                password_hash: "test_hash".to_string(), // Not used in tests
                email: None,
            },
        )
        .await?;

        let jwt_token = issue_token_pair(user.id, &user.username, &config.jwt)?.access_token;

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Ok(Some(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        }))
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends a request and returns the status and JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// Builds an authenticated request with an optional JSON body
    pub fn authed(&self, method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", self.auth_header());

        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Builds an unauthenticated JSON POST
pub fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn unique_username() -> String {
    format!("user-{}", Uuid::new_v4())
}

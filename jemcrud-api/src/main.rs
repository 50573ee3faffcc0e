//! # JemCRUD API Server
//!
//! REST backend for the JemCRUD web client: account signup/login with
//! bearer tokens, and CRUD over job positions.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/jemcrud cargo run -p jemcrud-api
//! ```

use jemcrud_api::{
    app::{build_router, AppState},
    config::Config,
};
use jemcrud_shared::db::{pool, schema};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "jemcrud_api=debug,jemcrud_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "JemCRUD API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    tracing::info!(
        jwt_secret_set = std::env::var("JWT_SECRET").is_ok(),
        database_url_set = config.database.url.is_some(),
        ssl_required = config.database.ssl.required,
        "Configuration loaded"
    );

    let db = pool::create_pool(&config.database).await?;

    // The server still starts if the DDL fails; requests will surface the problem
    if let Err(e) = schema::initialize_tables(&db).await {
        tracing::error!(error = %e, "Failed to initialize database tables");
    }

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}

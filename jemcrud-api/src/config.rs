/// Configuration management for the API server
///
/// Configuration comes from environment variables, with a `.env` file loaded
/// first if present.
///
/// # Environment Variables
///
/// - `HOST` / `PORT`: Bind address (default `0.0.0.0:3000`)
/// - `FRONTEND_URL`: Extra allowed CORS origin
/// - `DATABASE_URL`: Full PostgreSQL URL; overrides the discrete settings
/// - `DATABASE_HOST`, `DATABASE_PORT`, `DATABASE_USER`, `DATABASE_PASSWORD`, `DATABASE_NAME`
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default 10)
/// - `DATABASE_SSL_MODE=REQUIRED` or `DATABASE_SSL=true`: Require verified SSL
/// - `DATABASE_SSL_CA` (PEM content) or `DATABASE_SSL_CA_PATH` (file): CA certificate
/// - `JWT_SECRET`, `JWT_EXPIRES_IN` (default `1h`)
/// - `JWT_REFRESH_SECRET` (default `JWT_SECRET`), `JWT_REFRESH_EXPIRES_IN` (default `7d`)
///
/// # Example
///
/// ```no_run
/// use jemcrud_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use jemcrud_shared::auth::jwt::{parse_expires_in, JwtSettings};
use jemcrud_shared::db::pool::{DatabaseConfig, SslSettings};
use std::env;
use std::path::PathBuf;

/// Secret used when `JWT_SECRET` is unset; fine for local development only
pub const DEV_JWT_SECRET: &str = "dev-secret";

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtSettings,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Deployed frontend origin, allowed by CORS in addition to localhost
    /// and `*.vercel.app`
    pub frontend_url: Option<String>,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable or a token lifetime does not
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = get("PORT")
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("PORT must be a port number: {}", e))?
            .unwrap_or(3000);

        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: get("DATABASE_HOST").unwrap_or(defaults.host),
            port: get("DATABASE_PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("DATABASE_PORT must be a port number: {}", e))?
                .unwrap_or(defaults.port),
            user: get("DATABASE_USER").unwrap_or_default(),
            password: get("DATABASE_PASSWORD").unwrap_or_default(),
            name: get("DATABASE_NAME").unwrap_or_default(),
            ssl: SslSettings {
                required: get("DATABASE_SSL_MODE")
                    .is_some_and(|mode| mode.eq_ignore_ascii_case("REQUIRED"))
                    || get("DATABASE_SSL").as_deref() == Some("true"),
                ca_pem: get("DATABASE_SSL_CA"),
                ca_path: get("DATABASE_SSL_CA_PATH").map(PathBuf::from),
            },
            max_connections: get("DATABASE_MAX_CONNECTIONS")
                .map(|v| v.parse::<u32>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be a number: {}", e))?
                .unwrap_or(defaults.max_connections),
            connect_timeout_seconds: defaults.connect_timeout_seconds,
        };

        let access_secret = match get("JWT_SECRET") {
            Some(secret) => {
                if secret.len() < 32 {
                    tracing::warn!("JWT_SECRET is shorter than 32 characters");
                }
                secret
            }
            None => {
                tracing::warn!("JWT_SECRET: MISSING, falling back to the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };
        let refresh_secret = get("JWT_REFRESH_SECRET").unwrap_or_else(|| access_secret.clone());

        let access_expires_in = parse_expires_in(
            &get("JWT_EXPIRES_IN")
                .unwrap_or_else(|| JwtSettings::DEFAULT_ACCESS_EXPIRES_IN.to_string()),
        )?;
        let refresh_expires_in = parse_expires_in(
            &get("JWT_REFRESH_EXPIRES_IN")
                .unwrap_or_else(|| JwtSettings::DEFAULT_REFRESH_EXPIRES_IN.to_string()),
        )?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                frontend_url: get("FRONTEND_URL"),
            },
            database,
            jwt: JwtSettings {
                access_secret,
                access_expires_in,
                refresh_secret,
                refresh_expires_in,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Database connection pool management
///
/// Connections are described either by a full `postgres://` URL or by
/// discrete host/port/user/password/database settings. SSL can be required on
/// top of either, optionally pinned to a CA certificate supplied inline (PEM
/// content) or as a file path.
///
/// # Example
///
/// ```no_run
/// use jemcrud_shared::db::pool::{create_pool, DatabaseConfig, SslSettings};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig {
///     host: "db.example.com".to_string(),
///     user: "jemcrud".to_string(),
///     password: "secret".to_string(),
///     name: "jemcrud".to_string(),
///     ssl: SslSettings { required: true, ..Default::default() },
///     ..Default::default()
/// };
///
/// let pool = create_pool(&config).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Errors raised while building connection options or opening the pool
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DATABASE_URL` could not be parsed
    #[error("Invalid database URL: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    /// The CA certificate file could not be read
    #[error(
        "Failed to read SSL CA file at {}. Set DATABASE_SSL_CA_PATH to a valid path or disable SSL: {source}",
        .path.display()
    )]
    CaFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connecting or the startup health check failed
    #[error("Database connection failed: {0}")]
    Connect(#[from] sqlx::Error),
}

/// SSL settings for database connections
#[derive(Debug, Clone, Default)]
pub struct SslSettings {
    /// Whether SSL (with certificate verification) is required
    pub required: bool,

    /// CA certificate as PEM content; takes precedence over `ca_path`
    pub ca_pem: Option<String>,

    /// Path to a CA certificate file
    pub ca_path: Option<PathBuf>,
}

/// Configuration for the database connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; when set, the discrete fields below are ignored
    pub url: Option<String>,

    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,

    /// Database name
    pub name: String,

    pub ssl: SslSettings,

    /// Maximum number of connections in the pool
    ///
    /// Default: 10
    pub max_connections: u32,

    /// Timeout for acquiring a connection (seconds)
    ///
    /// Default: 60, generous enough for cold cloud databases
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: String::new(),
            password: String::new(),
            name: String::new(),
            ssl: SslSettings::default(),
            max_connections: 10,
            connect_timeout_seconds: 60,
        }
    }
}

impl DatabaseConfig {
    /// Builds sqlx connection options, applying SSL settings
    ///
    /// A CA file is read here, so a bad path fails at startup rather than on
    /// the first connection.
    ///
    /// # Errors
    ///
    /// - `DbError::InvalidUrl` if `url` does not parse
    /// - `DbError::CaFile` if `ssl.ca_path` cannot be read
    pub fn connect_options(&self) -> Result<PgConnectOptions, DbError> {
        let mut options = match &self.url {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .map_err(DbError::InvalidUrl)?,
            None => {
                let options = PgConnectOptions::new()
                    .host(&self.host)
                    .port(self.port)
                    .username(&self.user)
                    .password(&self.password)
                    .ssl_mode(PgSslMode::Disable);

                if self.name.is_empty() {
                    options
                } else {
                    options.database(&self.name)
                }
            }
        };

        if self.ssl.required {
            options = options.ssl_mode(PgSslMode::VerifyFull);

            if let Some(pem) = &self.ssl.ca_pem {
                info!("Using SSL certificate from DATABASE_SSL_CA");
                options = options.ssl_root_cert_from_pem(pem.as_bytes().to_vec());
            } else if let Some(path) = &self.ssl.ca_path {
                let pem = std::fs::read(path).map_err(|source| DbError::CaFile {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %path.display(), "Using SSL certificate from file");
                options = options.ssl_root_cert_from_pem(pem);
            } else {
                info!("Using default trusted CAs for SSL connection");
            }
        }

        Ok(options)
    }
}

/// Creates the connection pool and verifies connectivity
///
/// # Errors
///
/// Returns an error if the options are invalid, the database is unreachable,
/// or the health check fails. Callers treat this as fatal.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    info!(
        max_connections = config.max_connections,
        connect_timeout_seconds = config.connect_timeout_seconds,
        ssl_required = config.ssl.required,
        "Creating database connection pool"
    );

    let options = config.connect_options()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect_with(options)
        .await?;

    health_check(&pool).await?;

    info!("Database Successfully Connected");
    Ok(pool)
}

/// Executes `SELECT 1` to verify the database is reachable
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Gracefully closes the connection pool
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert!(config.url.is_none());
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout_seconds, 60);
        assert!(!config.ssl.required);
    }

    #[test]
    fn test_connect_options_from_discrete_fields() {
        let config = DatabaseConfig {
            host: "db.internal".to_string(),
            port: 6543,
            user: "app".to_string(),
            name: "jemcrud".to_string(),
            ..Default::default()
        };

        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "app");
        assert_eq!(options.get_database(), Some("jemcrud"));
    }

    #[test]
    fn test_connect_options_from_url() {
        let config = DatabaseConfig {
            url: Some("postgres://u:p@example.org:5433/app".to_string()),
            host: "ignored".to_string(),
            ..Default::default()
        };

        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "example.org");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("app"));
    }

    #[test]
    fn test_invalid_url() {
        let config = DatabaseConfig {
            url: Some("not a url at all".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            config.connect_options(),
            Err(DbError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_missing_ca_file_is_an_error() {
        let config = DatabaseConfig {
            ssl: SslSettings {
                required: true,
                ca_pem: None,
                ca_path: Some(PathBuf::from("/nonexistent/ca.pem")),
            },
            ..Default::default()
        };

        match config.connect_options() {
            Err(DbError::CaFile { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/ca.pem"))
            }
            other => panic!("expected CaFile error, got {:?}", other),
        }
    }

    #[test]
    fn test_ca_file_ignored_when_ssl_not_required() {
        let config = DatabaseConfig {
            ssl: SslSettings {
                required: false,
                ca_pem: None,
                ca_path: Some(PathBuf::from("/nonexistent/ca.pem")),
            },
            ..Default::default()
        };

        assert!(config.connect_options().is_ok());
    }
}

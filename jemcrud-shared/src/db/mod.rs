/// Database layer for JemCRUD
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool, connection and SSL settings
/// - `schema`: Idempotent table bootstrap run at startup
///
/// # Example
///
/// ```no_run
/// use jemcrud_shared::db::{pool::{create_pool, DatabaseConfig}, schema::initialize_tables};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: Some(std::env::var("DATABASE_URL")?),
///         ..Default::default()
///     };
///
///     let pool = create_pool(&config).await?;
///     initialize_tables(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod schema;

/// Schema bootstrap
///
/// The server owns a two-table schema and creates it on startup with
/// idempotent `CREATE TABLE IF NOT EXISTS` statements. There is no migration
/// history; changing an existing column means altering the database by hand.

use sqlx::PgPool;
use tracing::info;

/// Advisory lock key held while the DDL runs
const SCHEMA_LOCK_KEY: i64 = 0x6a65_6d63_7275_64;

/// `users` table DDL
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    username VARCHAR(255) NOT NULL UNIQUE,
    email VARCHAR(255),
    password VARCHAR(255) NOT NULL,
    first_name VARCHAR(255),
    last_name VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Case-insensitive uniqueness for usernames
pub const CREATE_USERNAME_LOWER_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS users_username_lower_key ON users (LOWER(username))
"#;

/// `positions` table DDL
///
/// Deleting a user nulls out the audit columns instead of deleting positions.
pub const CREATE_POSITIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS positions (
    id SERIAL PRIMARY KEY,
    position_code VARCHAR(50) NOT NULL,
    position_name VARCHAR(255) NOT NULL,
    created_by INTEGER REFERENCES users(id) ON DELETE SET NULL,
    updated_by INTEGER REFERENCES users(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Creates the `users` and `positions` tables if they do not exist
///
/// `users` is created first because `positions` references it. Both
/// statements run in one transaction under an advisory lock, so several
/// processes starting at once do not race on the catalog.
///
/// # Example
///
/// ```no_run
/// use jemcrud_shared::db::schema::initialize_tables;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// initialize_tables(&pool).await?;
/// initialize_tables(&pool).await?; // no-op
/// # Ok(())
/// # }
/// ```
pub async fn initialize_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    sqlx::query(CREATE_USERS_TABLE).execute(&mut *tx).await?;
    sqlx::query(CREATE_USERNAME_LOWER_INDEX)
        .execute(&mut *tx)
        .await?;
    sqlx::query(CREATE_POSITIONS_TABLE).execute(&mut *tx).await?;

    tx.commit().await?;

    info!("Database tables initialized successfully");
    Ok(())
}

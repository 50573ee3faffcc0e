/// Position model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE positions (
///     id SERIAL PRIMARY KEY,
///     position_code VARCHAR(50) NOT NULL,
///     position_name VARCHAR(255) NOT NULL,
///     created_by INTEGER REFERENCES users(id) ON DELETE SET NULL,
///     updated_by INTEGER REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Serialized positions use the field names the web client reads:
/// `position_id`, `position_code`, `position_name`, `created_at`, ...

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Maximum length of `position_code`
pub const POSITION_CODE_MAX_LEN: u64 = 50;

/// Maximum length of `position_name`
pub const POSITION_NAME_MAX_LEN: u64 = 255;

/// A job position
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Position {
    #[serde(rename = "position_id")]
    pub id: i32,

    pub position_code: String,
    pub position_name: String,

    /// User who created the position; NULL once that user is deleted
    pub created_by: Option<i32>,

    /// User who last updated the position; NULL once that user is deleted
    pub updated_by: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a position
#[derive(Debug, Clone)]
pub struct CreatePosition {
    pub position_code: String,
    pub position_name: String,
    pub created_by: Option<i32>,
}

/// Input for a partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct UpdatePosition {
    pub position_code: Option<String>,
    pub position_name: Option<String>,
    pub updated_by: Option<i32>,
}

const POSITION_COLUMNS: &str =
    "id, position_code, position_name, created_by, updated_by, created_at, updated_at";

impl Position {
    /// Inserts a new position; `updated_by` starts equal to `created_by`
    pub async fn create(pool: &PgPool, data: CreatePosition) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO positions (position_code, position_name, created_by, updated_by) \
             VALUES ($1, $2, $3, $3) RETURNING {}",
            POSITION_COLUMNS
        );

        sqlx::query_as::<_, Position>(&query)
            .bind(data.position_code)
            .bind(data.position_name)
            .bind(data.created_by)
            .fetch_one(pool)
            .await
    }

    /// Finds a position by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM positions WHERE id = $1", POSITION_COLUMNS);

        sqlx::query_as::<_, Position>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all positions ordered by ID
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM positions ORDER BY id", POSITION_COLUMNS);

        sqlx::query_as::<_, Position>(&query).fetch_all(pool).await
    }

    /// Applies a partial update
    ///
    /// `updated_by` and `updated_at` are always written. Returns `None` if no
    /// position has this ID.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdatePosition,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE positions SET \
                position_code = COALESCE($2, position_code), \
                position_name = COALESCE($3, position_name), \
                updated_by = $4, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            POSITION_COLUMNS
        );

        sqlx::query_as::<_, Position>(&query)
            .bind(id)
            .bind(data.position_code)
            .bind(data.position_name)
            .bind(data.updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a position; returns true if a row was deleted
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM positions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

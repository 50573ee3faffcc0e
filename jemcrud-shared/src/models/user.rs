/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     username VARCHAR(255) NOT NULL UNIQUE,  -- also unique on LOWER(username)
///     email VARCHAR(255),
///     password VARCHAR(255) NOT NULL,
///     first_name VARCHAR(255),
///     last_name VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use jemcrud_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         email: None,
///     },
/// )
/// .await?;
///
/// let found = User::find_by_username(&pool, "alice").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the unique constraint Postgres generates for `users.username`
pub const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

/// Unique index on `LOWER(username)`; usernames differing only in case collide
pub const USERNAME_LOWER_UNIQUE_INDEX: &str = "users_username_lower_key";

/// A user account
///
/// The `password` column holds an Argon2id PHC string, never plaintext. It is
/// skipped when serializing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,

    /// Unique login name
    pub username: String,

    pub email: Option<String>,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub email: Option<String>,
}

const USER_COLUMNS: &str =
    "id, username, email, password, first_name, last_name, created_at, updated_at";

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a database error naming [`USERNAME_UNIQUE_CONSTRAINT`] or
    /// [`USERNAME_LOWER_UNIQUE_INDEX`] if the username is taken.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password, email) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.username)
            .bind(data.password_hash)
            .bind(data.email)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by username, ignoring case
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM users WHERE LOWER(username) = LOWER($1)",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Checks whether a username is already registered, ignoring case
    pub async fn exists_by_username(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))",
        )
            .bind(username)
            .fetch_one(pool)
            .await
    }

    /// Lists all users, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Replaces a user's username and password hash
    ///
    /// Returns the updated user, or `None` if no user has this ID.
    pub async fn update_credentials(
        pool: &PgPool,
        id: i32,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET username = $2, password = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(username)
            .bind(password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a user by ID
    ///
    /// Positions created or last updated by this user survive; their
    /// `created_by` / `updated_by` columns become NULL.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

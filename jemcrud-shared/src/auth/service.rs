/// Signup, login, and token refresh over the `users` table
///
/// This is the business layer between the HTTP handlers and the models:
/// presence checks, the username uniqueness rule, credential verification,
/// and token issuance.
///
/// # Example
///
/// ```no_run
/// use jemcrud_shared::auth::{jwt::JwtSettings, service};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), service::AuthServiceError> {
/// let settings = JwtSettings::new("access-secret", "refresh-secret");
///
/// let signed_up = service::signup(&pool, &settings, "alice", "hunter2", None).await?;
/// let logged_in = service::login(&pool, &settings, "alice", "hunter2").await?;
/// assert_eq!(signed_up.user.id, logged_in.user.id);
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info};

use super::{
    jwt::{self, JwtError, JwtSettings},
    password::{self, PasswordError},
};
use crate::models::user::{
    CreateUser, User, USERNAME_LOWER_UNIQUE_INDEX, USERNAME_UNIQUE_CONSTRAINT,
};

/// Error type for authentication flows
///
/// The `Display` text of the client-facing variants is the exact message
/// returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    /// Unknown username or wrong password; the two are indistinguishable
    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("No Data found")]
    NoData,

    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Public view of a user returned alongside tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Result of a successful signup or login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

fn authenticated(user: &User, settings: &JwtSettings) -> Result<AuthResponse, AuthServiceError> {
    let tokens = jwt::issue_token_pair(user.id, &user.username, settings)?;

    Ok(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user: AuthUser::from(user),
    })
}

fn is_username_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                && db_err
                    .constraint()
                    .map_or(true, |c| {
                        c == USERNAME_UNIQUE_CONSTRAINT || c == USERNAME_LOWER_UNIQUE_INDEX
                    })
        }
        _ => false,
    }
}

/// Registers a user and logs them in
///
/// An empty `email` is stored as NULL.
///
/// # Errors
///
/// - `MissingCredentials` if username or password is empty
/// - `UsernameTaken` if the username exists, including when a concurrent
///   signup wins the race between the check and the insert
pub async fn signup(
    pool: &PgPool,
    settings: &JwtSettings,
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<AuthResponse, AuthServiceError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthServiceError::MissingCredentials);
    }

    if User::exists_by_username(pool, username).await? {
        debug!(username, "Signup rejected: username exists");
        return Err(AuthServiceError::UsernameTaken);
    }

    let password_hash = password::hash_password(password)?;

    let user = User::create(
        pool,
        CreateUser {
            username: username.to_string(),
            password_hash,
            email: email.filter(|e| !e.is_empty()).map(str::to_string),
        },
    )
    .await
    .map_err(|e| {
        if is_username_violation(&e) {
            AuthServiceError::UsernameTaken
        } else {
            AuthServiceError::Database(e)
        }
    })?;

    info!(user_id = user.id, username = %user.username, "User signed up");
    authenticated(&user, settings)
}

/// Verifies credentials and issues tokens
///
/// The username is matched case-insensitively; the password is not.
///
/// # Errors
///
/// `InvalidCredentials` if the username is unknown or the password is wrong
pub async fn login(
    pool: &PgPool,
    settings: &JwtSettings,
    username: &str,
    password: &str,
) -> Result<AuthResponse, AuthServiceError> {
    let user = User::find_by_username(pool, username)
        .await?
        .ok_or(AuthServiceError::InvalidCredentials)?;

    if !password::verify_password(password, &user.password)? {
        debug!(username, "Login rejected: wrong password");
        return Err(AuthServiceError::InvalidCredentials);
    }

    info!(user_id = user.id, "Login successful");
    authenticated(&user, settings)
}

/// Exchanges a refresh token for a new access token
pub fn refresh(refresh_token: &str, settings: &JwtSettings) -> Result<String, AuthServiceError> {
    Ok(jwt::refresh_access_token(refresh_token, settings)?)
}

/// Lists every user
///
/// # Errors
///
/// `NoData` if there are no users
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, AuthServiceError> {
    let users = User::list(pool).await?;
    if users.is_empty() {
        return Err(AuthServiceError::NoData);
    }
    Ok(users)
}

/// Fetches one user
///
/// # Errors
///
/// `NoData` if no user has this ID
pub async fn get_user(pool: &PgPool, id: i32) -> Result<User, AuthServiceError> {
    User::find_by_id(pool, id)
        .await?
        .ok_or(AuthServiceError::NoData)
}

/// Replaces a user's username and password (the password is re-hashed)
pub async fn update_user(
    pool: &PgPool,
    id: i32,
    username: &str,
    password: &str,
) -> Result<User, AuthServiceError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthServiceError::MissingCredentials);
    }

    let password_hash = password::hash_password(password)?;

    User::update_credentials(pool, id, username, &password_hash)
        .await
        .map_err(|e| {
            if is_username_violation(&e) {
                AuthServiceError::UsernameTaken
            } else {
                AuthServiceError::Database(e)
            }
        })?
        .ok_or(AuthServiceError::UserNotFound)
}

/// Deletes a user; their positions remain with NULL audit columns
pub async fn delete_user(pool: &PgPool, id: i32) -> Result<(), AuthServiceError> {
    if !User::delete(pool, id).await? {
        return Err(AuthServiceError::UserNotFound);
    }

    info!(user_id = id, "User deleted");
    Ok(())
}

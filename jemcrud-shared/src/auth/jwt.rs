/// JWT token generation and validation
///
/// Tokens are signed with HS256. Access and refresh tokens use separate
/// secrets and lifetimes (see [`JwtSettings`]); the `token_type` claim stops a
/// refresh token from being accepted as an access token even when both
/// secrets are the same.
///
/// # Token Types
///
/// - **Access Token**: Short-lived (default 1 hour), sent as `Authorization: Bearer`
/// - **Refresh Token**: Long-lived (default 7 days), exchanged for a new access token
///
/// Refresh tokens are stateless. Nothing is stored server-side, so they
/// cannot be revoked before they expire.
///
/// # Example
///
/// ```
/// use jemcrud_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, "alice", TokenType::Access, Duration::hours(1));
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.user_id, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim stamped on every token
pub const ISSUER: &str = "jemcrud";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format, or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was valid but of the other type
    #[error("Expected {expected} token, got {actual} token")]
    WrongTokenType {
        expected: &'static str,
        actual: &'static str,
    },

    /// An expiration setting such as `"1h"` could not be parsed
    #[error("Invalid token lifetime '{0}'")]
    InvalidExpiresIn(String),
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Secrets and lifetimes for both token types
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// Secret used to sign access tokens
    pub access_secret: String,

    /// Access token lifetime
    pub access_expires_in: Duration,

    /// Secret used to sign refresh tokens
    pub refresh_secret: String,

    /// Refresh token lifetime
    pub refresh_expires_in: Duration,
}

impl JwtSettings {
    /// Default access token lifetime (1 hour)
    pub const DEFAULT_ACCESS_EXPIRES_IN: &'static str = "1h";

    /// Default refresh token lifetime (7 days)
    pub const DEFAULT_REFRESH_EXPIRES_IN: &'static str = "7d";

    /// Creates settings with the default lifetimes
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            access_expires_in: Duration::hours(1),
            refresh_secret: refresh_secret.into(),
            refresh_expires_in: Duration::days(7),
        }
    }
}

/// JWT claims
///
/// `userId` and `username` mirror the payload the web client expects; the
/// remaining fields are the standard registered claims plus `token_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user ID
    #[serde(rename = "userId")]
    pub user_id: i32,

    /// Subject username
    pub username: String,

    /// Issuer, always [`ISSUER`]
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Access or refresh
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims expiring `expires_in` from now
    pub fn new(
        user_id: i32,
        username: impl Into<String>,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            username: username.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            token_type,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// A freshly issued access/refresh token pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs claims with HS256
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a token and extracts its claims
///
/// Checks the signature, `exp`, `nbf`, and that `iss` is [`ISSUER`]. Does not
/// check the token type.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    Ok(token_data.claims)
}

fn validate_typed(token: &str, secret: &str, expected: TokenType) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != expected {
        return Err(JwtError::WrongTokenType {
            expected: expected.as_str(),
            actual: claims.token_type.as_str(),
        });
    }

    Ok(claims)
}

/// Validates a token and checks it is an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_typed(token, secret, TokenType::Access)
}

/// Validates a token and checks it is a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_typed(token, secret, TokenType::Refresh)
}

/// Issues an access token and a refresh token for a user
///
/// # Example
///
/// ```
/// use jemcrud_shared::auth::jwt::{issue_token_pair, validate_refresh_token, JwtSettings};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = JwtSettings::new("access", "refresh");
/// let pair = issue_token_pair(7, "bob", &settings)?;
/// let claims = validate_refresh_token(&pair.refresh_token, "refresh")?;
/// assert_eq!(claims.user_id, 7);
/// # Ok(())
/// # }
/// ```
pub fn issue_token_pair(
    user_id: i32,
    username: &str,
    settings: &JwtSettings,
) -> Result<TokenPair, JwtError> {
    let access_claims = Claims::new(
        user_id,
        username,
        TokenType::Access,
        settings.access_expires_in,
    );
    let refresh_claims = Claims::new(
        user_id,
        username,
        TokenType::Refresh,
        settings.refresh_expires_in,
    );

    Ok(TokenPair {
        access_token: create_token(&access_claims, &settings.access_secret)?,
        refresh_token: create_token(&refresh_claims, &settings.refresh_secret)?,
    })
}

/// Exchanges a valid refresh token for a new access token
pub fn refresh_access_token(refresh_token: &str, settings: &JwtSettings) -> Result<String, JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, &settings.refresh_secret)?;

    let access_claims = Claims::new(
        refresh_claims.user_id,
        refresh_claims.username,
        TokenType::Access,
        settings.access_expires_in,
    );

    create_token(&access_claims, &settings.access_secret)
}

/// Parses a token lifetime such as `"1h"`, `"7d"`, `"30m"`, `"45s"` or `"2w"`
///
/// A bare number is a count of seconds. The value must be positive.
///
/// # Example
///
/// ```
/// use jemcrud_shared::auth::jwt::parse_expires_in;
/// use chrono::Duration;
///
/// assert_eq!(parse_expires_in("1h").unwrap(), Duration::hours(1));
/// assert_eq!(parse_expires_in("3600").unwrap(), Duration::seconds(3600));
/// assert!(parse_expires_in("soon").is_err());
/// ```
pub fn parse_expires_in(value: &str) -> Result<Duration, JwtError> {
    let invalid = || JwtError::InvalidExpiresIn(value.to_string());

    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let amount: i64 = digits.parse().map_err(|_| invalid())?;
    let multiplier: i64 = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        _ => return Err(invalid()),
    };

    let seconds = amount.checked_mul(multiplier).ok_or_else(invalid)?;
    if seconds <= 0 {
        return Err(invalid());
    }

    Duration::try_seconds(seconds).ok_or_else(invalid)
}

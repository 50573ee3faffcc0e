/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access/refresh token issuance and validation
/// - [`service`]: Signup, login, and refresh flows over the `users` table
/// - [`middleware`]: Bearer token parsing and the per-request [`middleware::AuthContext`]
///
/// # Example
///
/// ```no_run
/// use jemcrud_shared::auth::password::{hash_password, verify_password};
/// use jemcrud_shared::auth::jwt::{issue_token_pair, validate_access_token, JwtSettings};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let settings = JwtSettings::new("access-secret", "refresh-secret");
/// let tokens = issue_token_pair(1, "alice", &settings)?;
/// let claims = validate_access_token(&tokens.access_token, &settings.access_secret)?;
/// assert_eq!(claims.username, "alice");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

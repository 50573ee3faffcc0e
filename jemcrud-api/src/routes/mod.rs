/// API route handlers
///
/// - `root`: Welcome document
/// - `health`: Liveness and database connectivity
/// - `auth`: Signup, login, and token refresh
/// - `positions`: Position CRUD (authenticated)

pub mod auth;
pub mod health;
pub mod positions;
pub mod root;

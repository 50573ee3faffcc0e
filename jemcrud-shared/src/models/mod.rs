/// Database models for JemCRUD
///
/// Each model owns the SQL for its table. All statements are parameterized
/// and run against a shared `PgPool`.
///
/// # Models
///
/// - `user`: User accounts (`users` table)
/// - `position`: Job positions (`positions` table), with `created_by` /
///   `updated_by` referencing `users(id) ON DELETE SET NULL`

pub mod position;
pub mod user;

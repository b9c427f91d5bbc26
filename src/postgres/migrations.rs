//! Embedded database migrations.
//!
//! # Example
//!
//! ```rust,ignore
//! use palisade::postgres::migrations;
//! use sqlx::PgPool;
//!
//! async fn setup_database(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//!     migrations::run_core(pool).await?;
//!     Ok(())
//! }
//! ```

use sqlx::PgPool;

/// Runs core authentication migrations.
///
/// This includes tables for:
/// - `users`
/// - `session_tokens`
/// - `verification_tokens`
pub async fn run_core(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations/core").run(pool).await
}

mod session_token;
mod user;
mod verification;

pub mod migrations;

pub use session_token::PostgresSessionTokenRepository;
pub use user::PostgresUserRepository;
pub use verification::PostgresVerificationTokenRepository;

use sqlx::PgPool;

/// Creates all Postgres repository instances from a connection pool.
pub fn create_repositories(
    pool: PgPool,
) -> (
    PostgresUserRepository,
    PostgresSessionTokenRepository,
    PostgresVerificationTokenRepository,
) {
    (
        PostgresUserRepository::new(pool.clone()),
        PostgresSessionTokenRepository::new(pool.clone()),
        PostgresVerificationTokenRepository::new(pool),
    )
}

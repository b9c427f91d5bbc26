use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{AuthError, SessionTokenRecord, SessionTokenRepository};

#[derive(Clone)]
pub struct PostgresSessionTokenRepository {
    pool: PgPool,
}

impl PostgresSessionTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TokenRow {
    token: String,
    user_id: String,
    expires_at: DateTime<Utc>,
    is_valid: bool,
}

impl From<TokenRow> for SessionTokenRecord {
    fn from(row: TokenRow) -> Self {
        SessionTokenRecord {
            token: row.token,
            user_id: row.user_id,
            expires_at: row.expires_at,
            is_valid: row.is_valid,
        }
    }
}

#[async_trait]
impl SessionTokenRepository for PostgresSessionTokenRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, record), err))]
    async fn save_token(&self, record: SessionTokenRecord) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO session_tokens (token, user_id, expires_at, is_valid) VALUES ($1, $2, $3, $4)"
        )
        .bind(&record.token)
        .bind(&record.user_id)
        .bind(record.expires_at)
        .bind(record.is_valid)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "palisade_auth", "msg=\"database error\", operation=\"save_token\", error=\"{e}\"");
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, token), err))]
    async fn find_token(&self, token: &str) -> Result<Option<SessionTokenRecord>, AuthError> {
        let row: Option<TokenRow> = sqlx::query_as(
            "SELECT token, user_id, expires_at, is_valid FROM session_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "palisade_auth", "msg=\"database error\", operation=\"find_token\", error=\"{e}\"");
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, token), err))]
    async fn invalidate_token(&self, token: &str) -> Result<(), AuthError> {
        // zero rows affected means the token was never stored; still a success
        sqlx::query("UPDATE session_tokens SET is_valid = FALSE WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!(target: "palisade_auth", "msg=\"database error\", operation=\"invalidate_token\", error=\"{e}\"");
                AuthError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn invalidate_all_user_tokens(&self, user_id: &str) -> Result<u64, AuthError> {
        // one conditional update; no read-then-write window for a token
        // issued concurrently to slip through
        let result =
            sqlx::query("UPDATE session_tokens SET is_valid = FALSE WHERE user_id = $1 AND is_valid = TRUE")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    log::error!(target: "palisade_auth", "msg=\"database error\", operation=\"invalidate_all_user_tokens\", error=\"{e}\"");
                    AuthError::DatabaseError(e.to_string())
                })?;

        Ok(result.rows_affected())
    }
}

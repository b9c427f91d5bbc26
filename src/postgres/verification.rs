use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{AuthError, VerificationToken, VerificationTokenRepository};

#[derive(Clone)]
pub struct PostgresVerificationTokenRepository {
    pool: PgPool,
}

impl PostgresVerificationTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct VerificationRow {
    token: String,
    user_id: String,
    expires_at: DateTime<Utc>,
}

impl From<VerificationRow> for VerificationToken {
    fn from(row: VerificationRow) -> Self {
        VerificationToken {
            token: row.token,
            user_id: row.user_id,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl VerificationTokenRepository for PostgresVerificationTokenRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, token), err))]
    async fn create_verification_token(
        &self,
        token: VerificationToken,
    ) -> Result<VerificationToken, AuthError> {
        let row: VerificationRow = sqlx::query_as(
            "INSERT INTO verification_tokens (token, user_id, expires_at) VALUES ($1, $2, $3) RETURNING token, user_id, expires_at"
        )
        .bind(&token.token)
        .bind(&token.user_id)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "palisade_auth", "msg=\"database error\", operation=\"create_verification_token\", error=\"{e}\"");
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, token), err))]
    async fn find_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationToken>, AuthError> {
        let row: Option<VerificationRow> = sqlx::query_as(
            "SELECT token, user_id, expires_at FROM verification_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, token), err))]
    async fn delete_verification_token(&self, token: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM verification_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

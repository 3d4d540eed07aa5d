use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CreateSessionParams, RepoError, SessionsRepo};
use crate::domain::entities::AdminSessionRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct AdminSessionRow {
    id: Uuid,
    admin_id: Uuid,
    token_hash: String,
    expires_at: OffsetDateTime,
    created_at: OffsetDateTime,
}

impl From<AdminSessionRow> for AdminSessionRecord {
    fn from(row: AdminSessionRow) -> Self {
        Self {
            id: row.id,
            admin_id: row.admin_id,
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SessionsRepo for PostgresRepositories {
    async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<AdminSessionRecord, RepoError> {
        let row = sqlx::query_as::<_, AdminSessionRow>(
            "INSERT INTO admin_sessions (admin_id, token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING id, admin_id, token_hash, expires_at, created_at",
        )
        .bind(params.admin_id)
        .bind(params.token_hash)
        .bind(params.expires_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(AdminSessionRecord::from(row))
    }

    async fn find_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<AdminSessionRecord>, RepoError> {
        let row = sqlx::query_as::<_, AdminSessionRow>(
            "SELECT id, admin_id, token_hash, expires_at, created_at \
             FROM admin_sessions WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(AdminSessionRecord::from))
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM admin_sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn delete_sessions_for(&self, admin_id: Uuid) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM admin_sessions WHERE admin_id = $1")
            .bind(admin_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn purge_expired(&self, now: OffsetDateTime) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }
}

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{AdminUsersRepo, CreateAdminParams, RepoError};
use crate::domain::entities::AdminUserRecord;
use crate::domain::types::AdminRole;

use super::{PostgresRepositories, map_sqlx_error};

const ADMIN_COLUMNS: &str = "id, email, name, role, password_salt, password_hash, created_at";

#[derive(sqlx::FromRow)]
struct AdminUserRow {
    id: Uuid,
    email: String,
    name: String,
    role: AdminRole,
    password_salt: String,
    password_hash: String,
    created_at: OffsetDateTime,
}

impl From<AdminUserRow> for AdminUserRecord {
    fn from(row: AdminUserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            password_salt: row.password_salt,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AdminUsersRepo for PostgresRepositories {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admin_users WHERE email = $1");
        let row = sqlx::query_as::<_, AdminUserRow>(&sql)
            .bind(email)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(AdminUserRecord::from))
    }

    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminUserRecord>, RepoError> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admin_users WHERE id = $1");
        let row = sqlx::query_as::<_, AdminUserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(AdminUserRecord::from))
    }

    async fn create_admin(&self, params: CreateAdminParams) -> Result<AdminUserRecord, RepoError> {
        let sql = format!(
            "INSERT INTO admin_users (email, name, role, password_salt, password_hash) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ADMIN_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AdminUserRow>(&sql)
            .bind(params.email)
            .bind(params.name)
            .bind(params.role)
            .bind(params.password_salt)
            .bind(params.password_hash)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(AdminUserRecord::from(row))
    }

    async fn list_admins(&self, role: AdminRole) -> Result<Vec<AdminUserRecord>, RepoError> {
        let sql = format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_users WHERE role = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, AdminUserRow>(&sql)
            .bind(role)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(AdminUserRecord::from).collect())
    }

    /// Sessions go with the account through `ON DELETE CASCADE`.
    async fn delete_admin(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{PostQueryFilter, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::infra::db::{limit_param, map_sqlx_error};

use super::PostgresRepositories;
use super::types::{POST_COLUMNS, PostRow};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_recent(
        &self,
        filter: &PostQueryFilter,
        limit: u32,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE ($1::uuid IS NULL OR id <> $1) \
               AND ($2::text IS NULL OR category = $2) \
               AND ($3::text IS NULL OR subcategory = $3) \
               AND (NOT $4 OR is_slide) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $5"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(filter.exclude)
            .bind(filter.category.as_deref())
            .bind(filter.subcategory.as_deref())
            .bind(filter.slides_only)
            .bind(limit_param(limit))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }
}

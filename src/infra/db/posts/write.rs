use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{
    CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::PostRecord;
use crate::infra::db::map_sqlx_error;

use super::PostgresRepositories;
use super::types::{POST_COLUMNS, PostRow};

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let sql = format!(
            "INSERT INTO posts (title, content, category, subcategory, description, image_url, \
                                author_id, is_slide) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(params.title)
            .bind(params.content)
            .bind(params.category)
            .bind(params.subcategory)
            .bind(params.description)
            .bind(params.image_url)
            .bind(params.author_id)
            .bind(params.is_slide)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let sql = format!(
            "UPDATE posts \
             SET title = $2, content = $3, category = $4, subcategory = $5, description = $6, \
                 image_url = $7, is_slide = $8, updated_at = now() \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        );
        // fetch_one maps a missing row to RepoError::NotFound
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(params.id)
            .bind(params.title)
            .bind(params.content)
            .bind(params.category)
            .bind(params.subcategory)
            .bind(params.description)
            .bind(params.image_url)
            .bind(params.is_slide)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<i64, RepoError> {
        let count: Option<i64> = sqlx::query_scalar(
            "UPDATE posts SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        count.ok_or(RepoError::NotFound)
    }
}

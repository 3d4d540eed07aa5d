use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::application::repos::{PopupFields, PopupsRepo, PopupsWriteRepo, RepoError};
use crate::domain::entities::PopupRecord;

use super::{PostgresRepositories, limit_param, map_sqlx_error};

const POPUP_COLUMNS: &str = "id, title, content, image_url, link_url, start_date, end_date, \
     is_active, position, size_percentage, display_order, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PopupRow {
    id: Uuid,
    title: String,
    content: Option<String>,
    image_url: Option<String>,
    link_url: Option<String>,
    start_date: Date,
    end_date: Date,
    is_active: bool,
    position: Option<i32>,
    size_percentage: Option<i32>,
    display_order: Option<i32>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PopupRow> for PopupRecord {
    fn from(row: PopupRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            image_url: row.image_url,
            link_url: row.link_url,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
            position: row.position,
            size_percentage: row.size_percentage,
            display_order: row.display_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PopupsRepo for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<PopupRecord>, RepoError> {
        let sql = format!("SELECT {POPUP_COLUMNS} FROM popups ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, PopupRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(PopupRecord::from).collect())
    }

    async fn list_displayable(
        &self,
        day: Date,
        limit: u32,
    ) -> Result<Vec<PopupRecord>, RepoError> {
        let sql = format!(
            "SELECT {POPUP_COLUMNS} FROM popups \
             WHERE is_active AND start_date <= $1 AND end_date >= $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, PopupRow>(&sql)
            .bind(day)
            .bind(limit_param(limit))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(PopupRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PopupRecord>, RepoError> {
        let sql = format!("SELECT {POPUP_COLUMNS} FROM popups WHERE id = $1");
        let row = sqlx::query_as::<_, PopupRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(PopupRecord::from))
    }
}

#[async_trait]
impl PopupsWriteRepo for PostgresRepositories {
    async fn create_popup(&self, fields: PopupFields) -> Result<PopupRecord, RepoError> {
        let sql = format!(
            "INSERT INTO popups (title, content, image_url, link_url, start_date, end_date, \
                                 is_active, position, size_percentage, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {POPUP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PopupRow>(&sql)
            .bind(fields.title)
            .bind(fields.content)
            .bind(fields.image_url)
            .bind(fields.link_url)
            .bind(fields.start_date)
            .bind(fields.end_date)
            .bind(fields.is_active)
            .bind(fields.position)
            .bind(fields.size_percentage)
            .bind(fields.display_order)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(PopupRecord::from(row))
    }

    async fn update_popup(&self, id: Uuid, fields: PopupFields) -> Result<PopupRecord, RepoError> {
        let sql = format!(
            "UPDATE popups \
             SET title = $2, content = $3, image_url = $4, link_url = $5, start_date = $6, \
                 end_date = $7, is_active = $8, position = $9, size_percentage = $10, \
                 display_order = $11, updated_at = now() \
             WHERE id = $1 \
             RETURNING {POPUP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PopupRow>(&sql)
            .bind(id)
            .bind(fields.title)
            .bind(fields.content)
            .bind(fields.image_url)
            .bind(fields.link_url)
            .bind(fields.start_date)
            .bind(fields.end_date)
            .bind(fields.is_active)
            .bind(fields.position)
            .bind(fields.size_percentage)
            .bind(fields.display_order)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(PopupRecord::from(row))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<PopupRecord, RepoError> {
        let sql = format!(
            "UPDATE popups SET is_active = $2, updated_at = now() WHERE id = $1 \
             RETURNING {POPUP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PopupRow>(&sql)
            .bind(id)
            .bind(is_active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(PopupRecord::from(row))
    }

    async fn delete_popup(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM popups WHERE id = $1")
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

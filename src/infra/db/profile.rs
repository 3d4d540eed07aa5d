use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{ProfileRepo, RepoError, SaveProfileParams};
use crate::domain::entities::AboutMeRecord;

use super::{PostgresRepositories, map_sqlx_error};

const PROFILE_COLUMNS: &str = "name, title, introduction, career, industry_expertise, \
     area_of_expertise, profile_image_url, updated_at";

#[derive(sqlx::FromRow)]
struct AboutMeRow {
    name: String,
    title: String,
    introduction: String,
    career: Vec<String>,
    industry_expertise: Vec<String>,
    area_of_expertise: Vec<String>,
    profile_image_url: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<AboutMeRow> for AboutMeRecord {
    fn from(row: AboutMeRow) -> Self {
        Self {
            name: row.name,
            title: row.title,
            introduction: row.introduction,
            career: row.career,
            industry_expertise: row.industry_expertise,
            area_of_expertise: row.area_of_expertise,
            profile_image_url: row.profile_image_url,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProfileRepo for PostgresRepositories {
    async fn load_profile(&self) -> Result<Option<AboutMeRecord>, RepoError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM about_me WHERE id = 1");
        let row = sqlx::query_as::<_, AboutMeRow>(&sql)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(AboutMeRecord::from))
    }

    async fn save_profile(&self, params: SaveProfileParams) -> Result<AboutMeRecord, RepoError> {
        let sql = format!(
            "INSERT INTO about_me (id, name, title, introduction, career, industry_expertise, \
                                   area_of_expertise, profile_image_url, updated_at) \
             VALUES (1, $1, $2, $3, $4, $5, $6, $7, now()) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 title = EXCLUDED.title, \
                 introduction = EXCLUDED.introduction, \
                 career = EXCLUDED.career, \
                 industry_expertise = EXCLUDED.industry_expertise, \
                 area_of_expertise = EXCLUDED.area_of_expertise, \
                 profile_image_url = EXCLUDED.profile_image_url, \
                 updated_at = now() \
             RETURNING {PROFILE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AboutMeRow>(&sql)
            .bind(params.name)
            .bind(params.title)
            .bind(params.introduction)
            .bind(params.career)
            .bind(params.industry_expertise)
            .bind(params.area_of_expertise)
            .bind(params.profile_image_url)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(AboutMeRecord::from(row))
    }
}

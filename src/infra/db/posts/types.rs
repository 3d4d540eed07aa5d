use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::PostRecord;

pub(super) const POST_COLUMNS: &str = "id, title, content, category, subcategory, description, \
     image_url, author_id, view_count, is_slide, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
    pub(crate) subcategory: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) author_id: Option<Uuid>,
    pub(crate) view_count: i64,
    pub(crate) is_slide: bool,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            category: row.category,
            subcategory: row.subcategory,
            description: row.description,
            image_url: row.image_url,
            author_id: row.author_id,
            view_count: row.view_count,
            is_slide: row.is_slide,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::types::AdminRole;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Option<Uuid>,
    pub view_count: i64,
    pub is_slide: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupRecord {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub is_active: bool,
    pub position: Option<i32>,
    pub size_percentage: Option<i32>,
    pub display_order: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutMeRecord {
    pub name: String,
    pub title: String,
    pub introduction: String,
    pub career: Vec<String>,
    pub industry_expertise: Vec<String>,
    pub area_of_expertise: Vec<String>,
    pub profile_image_url: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminUserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub password_salt: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminSessionRecord {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

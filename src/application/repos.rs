//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::entities::{
    AboutMeRecord, AdminSessionRecord, AdminUserRecord, PopupRecord, PostRecord,
};
use crate::domain::types::AdminRole;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Option<Uuid>,
    pub is_slide: bool,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_slide: bool,
}

#[derive(Debug, Clone)]
pub struct PopupFields {
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
}

#[derive(Debug, Clone)]
pub struct CreateAdminParams {
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub password_salt: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct CreateSessionParams {
    pub admin_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct SaveProfileParams {
    pub name: String,
    pub title: String,
    pub introduction: String,
    pub career: Vec<String>,
    pub industry_expertise: Vec<String>,
    pub area_of_expertise: Vec<String>,
    pub profile_image_url: Option<String>,
}

/// Narrows a post listing. The default matches every post.
#[derive(Debug, Clone, Default)]
pub struct PostQueryFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub slides_only: bool,
    pub exclude: Option<Uuid>,
}

impl PostQueryFilter {
    pub fn matches(&self, post: &PostRecord) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| post.category == category)
            && self
                .subcategory
                .as_deref()
                .is_none_or(|sub| post.subcategory.as_deref() == Some(sub))
            && (!self.slides_only || post.is_slide)
            && self.exclude != Some(post.id)
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Newest first by `created_at`, at most `limit` rows matching `filter`.
    async fn list_recent(
        &self,
        filter: &PostQueryFilter,
        limit: u32,
    ) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;

    /// Atomically bump the view counter and return the new value.
    async fn increment_view_count(&self, id: Uuid) -> Result<i64, RepoError>;
}

#[async_trait]
pub trait PopupsRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<PopupRecord>, RepoError>;

    /// Active popups whose window contains `day`, newest first.
    async fn list_displayable(&self, day: Date, limit: u32)
    -> Result<Vec<PopupRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PopupRecord>, RepoError>;
}

#[async_trait]
pub trait PopupsWriteRepo: Send + Sync {
    async fn create_popup(&self, fields: PopupFields) -> Result<PopupRecord, RepoError>;

    async fn update_popup(&self, id: Uuid, fields: PopupFields) -> Result<PopupRecord, RepoError>;

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<PopupRecord, RepoError>;

    async fn delete_popup(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AdminUsersRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError>;

    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminUserRecord>, RepoError>;

    async fn create_admin(&self, params: CreateAdminParams) -> Result<AdminUserRecord, RepoError>;

    /// Every account holding `role`, newest first.
    async fn list_admins(&self, role: AdminRole) -> Result<Vec<AdminUserRecord>, RepoError>;

    async fn delete_admin(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait SessionsRepo: Send + Sync {
    async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<AdminSessionRecord, RepoError>;

    async fn find_session(&self, token_hash: &str)
    -> Result<Option<AdminSessionRecord>, RepoError>;

    async fn delete_session(&self, token_hash: &str) -> Result<(), RepoError>;

    async fn delete_sessions_for(&self, admin_id: Uuid) -> Result<(), RepoError>;

    async fn purge_expired(&self, now: OffsetDateTime) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn load_profile(&self) -> Result<Option<AboutMeRecord>, RepoError>;

    async fn save_profile(&self, params: SaveProfileParams) -> Result<AboutMeRecord, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn health_check(&self) -> Result<(), RepoError>;
}

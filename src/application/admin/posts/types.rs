use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::posts::{category_slug, is_slide_category};

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("{0} is required")]
    ConstraintViolation(&'static str),
    #[error("article not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AdminPostError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AdminPostError::NotFound,
            other => AdminPostError::Repo(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

pub(crate) struct NormalizedFields {
    pub title: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_slide: bool,
}

pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), AdminPostError> {
    if value.trim().is_empty() {
        return Err(AdminPostError::ConstraintViolation(field));
    }
    Ok(())
}

pub(crate) fn normalize_fields(
    title: String,
    content: String,
    category: String,
    subcategory: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
) -> Result<NormalizedFields, AdminPostError> {
    ensure_non_empty(&title, "title")?;
    ensure_non_empty(&category, "category")?;
    ensure_non_empty(&content, "content")?;

    let category = category_slug(&category);
    if category.is_empty() {
        return Err(AdminPostError::ConstraintViolation("category"));
    }
    let subcategory = subcategory
        .map(|value| category_slug(&value))
        .filter(|value| !value.is_empty());

    Ok(NormalizedFields {
        title: title.trim().to_string(),
        is_slide: is_slide_category(&category),
        category,
        subcategory,
        content,
        description: non_blank(description),
        image_url: non_blank(image_url),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

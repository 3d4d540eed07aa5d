use std::sync::Arc;

use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::repos::{PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError};
use crate::domain::entities::PostRecord;

#[derive(Debug, Error)]
pub enum ViewCountError {
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ViewCountError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => ViewCountError::NotFound,
            other => ViewCountError::Repo(other),
        }
    }
}

/// An article together with the related posts shown beneath it.
#[derive(Debug, Clone)]
pub struct ArticleView {
    pub post: PostRecord,
    pub related: Vec<PostRecord>,
}

/// Read side of the public site. Fetch failures degrade to "no posts".
#[derive(Clone)]
pub struct PostFeedService {
    posts: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
}

impl PostFeedService {
    pub fn new(posts: Arc<dyn PostsRepo>, writer: Arc<dyn PostsWriteRepo>) -> Self {
        Self { posts, writer }
    }

    /// Up to `limit` most recent posts, newest first; empty when the fetch fails.
    pub async fn recent_posts(&self, limit: u32) -> Vec<PostRecord> {
        self.fetch_recent(&PostQueryFilter::default(), limit).await
    }

    /// Newest posts sharing `current`'s category, never `current` itself.
    pub async fn related_posts(&self, current: &PostRecord, limit: u32) -> Vec<PostRecord> {
        let filter = PostQueryFilter {
            category: Some(current.category.clone()),
            exclude: Some(current.id),
            ..PostQueryFilter::default()
        };
        self.fetch_recent(&filter, limit).await
    }

    /// Listing for a category page, optionally narrowed to one subcategory.
    pub async fn category_posts(
        &self,
        category: &str,
        subcategory: Option<&str>,
        limit: u32,
    ) -> Vec<PostRecord> {
        let filter = PostQueryFilter {
            category: Some(category.to_owned()),
            subcategory: subcategory.map(str::to_owned),
            ..PostQueryFilter::default()
        };
        self.fetch_recent(&filter, limit).await
    }

    /// Posts flagged for the home page slider.
    pub async fn slide_posts(&self, limit: u32) -> Vec<PostRecord> {
        let filter = PostQueryFilter {
            slides_only: true,
            ..PostQueryFilter::default()
        };
        self.fetch_recent(&filter, limit).await
    }

    /// The article page payload, or `None` when the post is missing or unreadable.
    pub async fn article(&self, id: Uuid, related_limit: u32) -> Option<ArticleView> {
        let post = match self.posts.find_by_id(id).await {
            Ok(Some(post)) => post,
            Ok(None) => return None,
            Err(err) => {
                error!(
                    target = "pressroom::application::feed",
                    post_id = %id,
                    error = %err,
                    "failed to load article"
                );
                return None;
            }
        };
        let related = self.related_posts(&post, related_limit).await;
        Some(ArticleView { post, related })
    }

    pub async fn increment_view_count(&self, id: Uuid) -> Result<i64, ViewCountError> {
        if self.posts.find_by_id(id).await?.is_none() {
            return Err(ViewCountError::NotFound);
        }
        Ok(self.writer.increment_view_count(id).await?)
    }

    /// Fire-and-forget view count bump for page renders.
    pub fn record_view(&self, id: Uuid) {
        let writer = self.writer.clone();
        tokio::spawn(async move {
            if let Err(err) = writer.increment_view_count(id).await {
                warn!(
                    target = "pressroom::application::feed",
                    post_id = %id,
                    error = %err,
                    "failed to record article view"
                );
            }
        });
    }

    async fn fetch_recent(&self, filter: &PostQueryFilter, limit: u32) -> Vec<PostRecord> {
        if limit == 0 {
            return Vec::new();
        }

        match self.posts.list_recent(filter, limit).await {
            Ok(mut posts) => {
                posts.retain(|post| filter.matches(post));
                // stable, so equal timestamps keep store order
                posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                posts.truncate(limit as usize);
                posts
            }
            Err(err) => {
                metrics::counter!("pressroom_posts_fetch_failed_total").increment(1);
                error!(
                    target = "pressroom::application::feed",
                    limit,
                    category = filter.category.as_deref(),
                    error = %err,
                    "failed to fetch recent posts"
                );
                Vec::new()
            }
        }
    }
}

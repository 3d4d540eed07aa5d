use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::application::repos::{ProfileRepo, RepoError, SaveProfileParams};
use crate::domain::entities::AboutMeRecord;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
struct CachedProfile {
    record: AboutMeRecord,
    fetched_at: Instant,
}

/// In-process cache in front of the singleton about-me profile.
#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfileRepo>,
    ttl: Duration,
    cache: Arc<RwLock<Option<CachedProfile>>>,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn ProfileRepo>, ttl: Duration) -> Self {
        Self {
            repo,
            ttl,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Fresh cached copy, else the store; falls back to a stale copy when the store fails.
    pub async fn load(&self) -> Option<AboutMeRecord> {
        if let Some(cached) = self.cache.read().await.as_ref()
            && cached.fetched_at.elapsed() < self.ttl
        {
            return Some(cached.record.clone());
        }

        match self.repo.load_profile().await {
            Ok(Some(record)) => {
                *self.cache.write().await = Some(CachedProfile {
                    record: record.clone(),
                    fetched_at: Instant::now(),
                });
                Some(record)
            }
            Ok(None) => {
                *self.cache.write().await = None;
                None
            }
            Err(err) => {
                error!(
                    target = "pressroom::application::profile",
                    error = %err,
                    "failed to refresh profile; serving cached copy if any"
                );
                self.cache
                    .read()
                    .await
                    .as_ref()
                    .map(|cached| cached.record.clone())
            }
        }
    }

    pub async fn update(&self, params: SaveProfileParams) -> Result<AboutMeRecord, ProfileError> {
        if params.name.trim().is_empty() {
            return Err(ProfileError::ConstraintViolation("name"));
        }
        let params = SaveProfileParams {
            name: params.name.trim().to_string(),
            title: params.title.trim().to_string(),
            introduction: params.introduction.trim().to_string(),
            career: clean_list(params.career),
            industry_expertise: clean_list(params.industry_expertise),
            area_of_expertise: clean_list(params.area_of_expertise),
            profile_image_url: params
                .profile_image_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        };

        let record = self.repo.save_profile(params).await?;
        *self.cache.write().await = Some(CachedProfile {
            record: record.clone(),
            fetched_at: Instant::now(),
        });
        info!(
            target = "pressroom::application::profile",
            "profile updated"
        );
        Ok(record)
    }
}

/// Split a textarea value into one trimmed item per non-blank line.
pub fn split_lines(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

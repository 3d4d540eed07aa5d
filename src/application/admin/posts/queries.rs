use uuid::Uuid;

use crate::application::repos::PostQueryFilter;
use crate::domain::entities::PostRecord;

use super::service::AdminPostService;
use super::types::AdminPostError;

impl AdminPostService {
    /// Newest articles for the admin tables. Errors surface, unlike the public feed.
    pub async fn list(&self, limit: u32) -> Result<Vec<PostRecord>, AdminPostError> {
        self.reader
            .list_recent(&PostQueryFilter::default(), limit)
            .await
            .map_err(AdminPostError::from)
    }

    pub async fn load_post(&self, id: Uuid) -> Result<Option<PostRecord>, AdminPostError> {
        self.reader
            .find_by_id(id)
            .await
            .map_err(AdminPostError::from)
    }
}

use std::sync::Arc;

use crate::application::feed::PostFeedService;

#[derive(Clone)]
pub struct ApiState {
    pub feed: Arc<PostFeedService>,
}

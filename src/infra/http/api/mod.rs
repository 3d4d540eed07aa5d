pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{Router, routing::post};

use crate::infra::http::RouterState;

pub fn build_api_router() -> Router<RouterState> {
    Router::new().route(
        "/api/increment-view-count",
        post(handlers::increment_view_count),
    )
}

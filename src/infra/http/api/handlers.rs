use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use uuid::Uuid;

use crate::application::feed::ViewCountError;

use super::error::ApiError;
use super::models::{IncrementViewCountRequest, IncrementViewCountResponse};
use super::state::ApiState;

pub async fn increment_view_count(
    State(state): State<ApiState>,
    payload: Result<Json<IncrementViewCountRequest>, JsonRejection>,
) -> Result<Json<IncrementViewCountResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|err| ApiError::bad_request("Invalid request body", Some(err.body_text())))?;

    let post_id = request
        .post_id
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::bad_request("postId is required", None))?;

    let post_id = Uuid::parse_str(post_id)
        .map_err(|err| ApiError::bad_request("postId must be a UUID", Some(err.to_string())))?;

    match state.feed.increment_view_count(post_id).await {
        Ok(new_view_count) => Ok(Json(IncrementViewCountResponse {
            message: "View count incremented",
            new_view_count,
        })),
        Err(ViewCountError::NotFound) => Err(ApiError::not_found("Post not found")),
        Err(ViewCountError::Repo(err)) => Err(ApiError::internal(
            "Failed to increment view count",
            err.to_string(),
        )),
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementViewCountRequest {
    pub post_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementViewCountResponse {
    pub message: &'static str,
    pub new_view_count: i64,
}

use axum::Json;
use axum::extract::{Path, State};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// 浏览计数。读者端在页面渲染完成后异步调用一次，
/// 失败与否都不应影响阅读；等待结果的调用方会拿到错误
pub async fn increment_views(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let views = state.posts().increment_views(&id).await?;
    Ok(Json(json!({ "views": views })))
}

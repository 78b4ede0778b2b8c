use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use crate::content::{PostStatus, markdown};
use crate::error::ApiError;
use crate::service::post::{ListQuery, Post, PostSummary, SavePostRequest};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PostSummary>>, ApiError> {
    let status = match params.status.as_deref() {
        Some(s) if !s.is_empty() => {
            Some(PostStatus::parse(s).ok_or_else(|| {
                ApiError::validation("status", "状态只能是 draft 或 published")
            })?)
        }
        _ => None,
    };

    let posts = state
        .posts()
        .list(&ListQuery {
            page: params.page.unwrap_or(1),
            per_page: params.per_page,
            status,
            search: params.search.filter(|s| !s.is_empty()),
            sort: params.sort,
        })
        .await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts().get(&id).await?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<SavePostRequest>,
) -> Result<Response, ApiError> {
    let post = state.posts().save(None, &body).await?;
    tracing::info!("文章已创建：{}（{}）", post.id, post.slug);
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SavePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts().save(Some(&id), &body).await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.posts().delete(&id).await?;
    tracing::info!("文章已删除：{id}");
    Ok(Json(json!({ "ok": true })))
}

pub async fn publish_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts().set_status(&id, PostStatus::Published).await?;
    tracing::info!("文章已发布：{id}");
    Ok(Json(post))
}

pub async fn unpublish_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts().set_status(&id, PostStatus::Draft).await?;
    tracing::info!("文章已撤回草稿：{id}");
    Ok(Json(post))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugCheckParams {
    pub slug: String,
    pub excluding_id: Option<String>,
}

pub async fn check_slug(
    State(state): State<AppState>,
    Query(params): Query<SlugCheckParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let slug = params.slug.trim();
    if slug.is_empty() {
        return Err(ApiError::validation("slug", "slug 不能为空"));
    }

    let available = state
        .posts()
        .slug_available(slug, params.excluding_id.as_deref())
        .await?;
    Ok(Json(json!({ "available": available })))
}

#[derive(Deserialize)]
pub struct PreviewBody {
    pub content: String,
}

/// 编辑器预览：Markdown 渲染为 HTML。纯计算，不落库
pub async fn preview_markdown(Json(body): Json<PreviewBody>) -> Json<serde_json::Value> {
    Json(json!({ "html": markdown::render_markdown(&body.content) }))
}

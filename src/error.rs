use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// 写作管线的错误分类。
/// 调用方需要区分三类可操作的失败：字段校验、slug 冲突、目标不存在；
/// 其余持久化失败统一对外呈现为可重试的通用错误
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("字段校验失败（{field}）：{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("slug 已被占用：{slug}")]
    SlugConflict { slug: String },

    #[error("文章不存在：{id}")]
    NotFound { id: String },

    #[error("持久化失败：{0}")]
    Persistence(#[from] sqlx::Error),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// 写入失败的归类：slug 唯一索引冲突单独成类，
    /// 应用层的可用性预检查存在竞态，这里是最终兜底
    pub fn from_db_write(err: sqlx::Error, slug: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::SlugConflict {
                slug: slug.to_string(),
            },
            _ => Self::Persistence(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": message,
                    "details": { "field": field },
                }),
            ),
            Self::SlugConflict { slug } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "slug 已被占用，请换一个",
                    "details": { "slug": slug },
                }),
            ),
            Self::NotFound { id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "文章不存在",
                    "details": { "id": id },
                }),
            ),
            // 不向调用方泄露内部细节，完整错误只进日志
            Self::Persistence(e) => {
                tracing::error!("持久化失败：{e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "服务器错误，请稍后重试" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub mod health;
pub mod posts;
pub mod views;

pub fn router(state: AppState) -> Router {
    // 写作后台接口。登录/会话校验由前置网关负责，不在本服务内实现
    let admin_api = Router::new()
        .route(
            "/admin/api/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route(
            "/admin/api/posts/{id}",
            get(posts::get_post).post(posts::update_post),
        )
        .route("/admin/api/posts/{id}/delete", post(posts::delete_post))
        .route("/admin/api/posts/{id}/publish", post(posts::publish_post))
        .route("/admin/api/posts/{id}/unpublish", post(posts::unpublish_post))
        .route("/admin/api/slug-check", get(posts::check_slug))
        .route("/admin/api/preview", post(posts::preview_markdown));

    // 读者侧公开接口：浏览计数与健康检查，允许站点前端跨域调用
    let public_api = Router::new()
        .route("/api/posts/{id}/views", post(views::increment_views))
        .route("/api/health", get(health::health_check))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));

    Router::new()
        .merge(admin_api)
        .merge(public_api)
        .with_state(state)
}

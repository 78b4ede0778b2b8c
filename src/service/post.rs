//! 文章生命周期控制：保存、发布切换、删除、浏览计数。
//! 状态只有 draft / published 两种；published_at 在首次发布时写入一次，
//! 此后任何保存都不再移动它（源系统每次发布保存都重置发布时间，
//! 这里视为缺陷，不予沿袭）

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ulid::Ulid;

use crate::config::SiteConfig;
use crate::content::{PostStatus, StoredContent, derived, slug};
use crate::error::ApiError;
use crate::repository::PostRepository;
use crate::repository::post::{PostListParams, PostRow, PostSort, PostSummaryRow, PostWriteParams};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_EXCERPT_LEN: usize = 500;

/// 编辑器保存请求（字段命名对齐前端 JSON 约定）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePostRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub author: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub content: String,
    pub status: PostStatus,
}

/// 对外返回的文章完整记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub read_time: u32,
    pub status: PostStatus,
    pub views: i64,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    fn from_row(row: PostRow) -> Self {
        Self {
            tags: serde_json::from_str(&row.tags).unwrap_or_default(),
            status: PostStatus::parse(&row.status).unwrap_or(PostStatus::Draft),
            id: row.id,
            slug: row.slug,
            title: row.title,
            content: row.content,
            excerpt: row.excerpt,
            author: row.author,
            cover_image: row.cover_image,
            category: row.category,
            featured: row.featured,
            read_time: row.read_time.max(1) as u32,
            views: row.views,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// 列表项（不含正文）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub category: Option<String>,
    pub featured: bool,
    pub read_time: u32,
    pub status: PostStatus,
    pub views: i64,
    pub published_at: Option<String>,
    pub updated_at: String,
}

impl PostSummary {
    fn from_row(row: PostSummaryRow) -> Self {
        Self {
            status: PostStatus::parse(&row.status).unwrap_or(PostStatus::Draft),
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            author: row.author,
            category: row.category,
            featured: row.featured,
            read_time: row.read_time.max(1) as u32,
            views: row.views,
            published_at: row.published_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Default)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: Option<i64>,
    pub status: Option<PostStatus>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Clone)]
pub struct PostService {
    repo: PostRepository,
    config: Arc<SiteConfig>,
}

impl PostService {
    pub fn new(repo: PostRepository, config: Arc<SiteConfig>) -> Self {
        Self { repo, config }
    }

    /// 保存文章。id 为 None 时创建，否则更新。
    /// 校验 → 派生字段 → 首次发布时间戳 → 落库，返回库中的规范记录
    pub async fn save(&self, id: Option<&str>, req: &SavePostRequest) -> Result<Post, ApiError> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(ApiError::validation("title", "标题不能为空"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ApiError::validation(
                "title",
                format!("标题不能超过 {MAX_TITLE_LEN} 字符"),
            ));
        }

        let author = req.author.trim();
        if author.is_empty() {
            return Err(ApiError::validation("author", "作者不能为空"));
        }

        // 客户端未给 slug 时由标题推导；给了就必须通过格式校验
        let slug = match req.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slug::generate_slug(title),
        };
        if !slug::is_valid_slug(&slug) {
            return Err(ApiError::validation(
                "slug",
                "slug 只能由小写字母、数字和连字符组成，且不超过 200 字符",
            ));
        }

        if let Some(excerpt) = req.excerpt.as_deref()
            && excerpt.chars().count() > MAX_EXCERPT_LEN
        {
            return Err(ApiError::validation(
                "excerpt",
                format!("摘要不能超过 {MAX_EXCERPT_LEN} 字符"),
            ));
        }

        // 阅读时长每次保存重算；摘要只在作者未提供时派生
        let read_time = derived::read_time(&req.content, self.config.content.words_per_minute);
        let excerpt = match req.excerpt.as_deref().map(str::trim) {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => derived::excerpt(&req.content, self.config.content.excerpt_length),
        };

        let tags_json =
            serde_json::to_string(&req.tags).unwrap_or_else(|_| "[]".to_string());
        let now = Utc::now().to_rfc3339();

        let post_id = match id {
            None => {
                let new_id = Ulid::new().to_string();
                // 新文章直接以 published 状态保存时，发布时间就是现在
                let published_at =
                    (req.status == PostStatus::Published).then(|| now.clone());

                let params = PostWriteParams {
                    id: &new_id,
                    slug: &slug,
                    title,
                    content: &req.content,
                    excerpt: &excerpt,
                    author,
                    cover_image: req.cover_image.as_deref(),
                    tags_json: &tags_json,
                    category: req.category.as_deref(),
                    featured: req.featured,
                    read_time: read_time as i64,
                    status: req.status.as_str(),
                    published_at: published_at.as_deref(),
                    updated_at: &now,
                };
                self.repo
                    .create(&params, &now)
                    .await
                    .map_err(|e| ApiError::from_db_write(e, &slug))?;
                new_id
            }
            Some(id) => {
                let existing = self
                    .repo
                    .get(id)
                    .await?
                    .ok_or_else(|| ApiError::not_found(id))?;

                // 只在从未发布过且目标状态为 published 时写入发布时间
                let published_at = match (&existing.published_at, req.status) {
                    (None, PostStatus::Published) => Some(now.clone()),
                    (existing, _) => existing.clone(),
                };

                let params = PostWriteParams {
                    id,
                    slug: &slug,
                    title,
                    content: &req.content,
                    excerpt: &excerpt,
                    author,
                    cover_image: req.cover_image.as_deref(),
                    tags_json: &tags_json,
                    category: req.category.as_deref(),
                    featured: req.featured,
                    read_time: read_time as i64,
                    status: req.status.as_str(),
                    published_at: published_at.as_deref(),
                    updated_at: &now,
                };
                self.repo
                    .update(&params)
                    .await
                    .map_err(|e| ApiError::from_db_write(e, &slug))?;
                id.to_string()
            }
        };

        self.get(&post_id).await
    }

    /// 读取文章。旧格式内容先归一化为 Markdown，
    /// 并尽力回写（首次触达即取代旧格式，回写失败只记日志）
    pub async fn get(&self, id: &str) -> Result<Post, ApiError> {
        let mut row = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found(id))?;

        let stored = StoredContent::parse(&row.content);
        if stored.is_legacy() {
            let markdown = stored.into_markdown();
            tracing::info!("文章 {id} 为旧格式内容，已转换为 Markdown");
            if let Err(e) = self.repo.update_content(id, &markdown).await {
                tracing::warn!("旧格式内容回写失败（{id}）：{e}");
            }
            row.content = markdown;
        }

        Ok(Post::from_row(row))
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<PostSummary>, ApiError> {
        let sort = match query.sort.as_deref() {
            Some("views") => PostSort::Views,
            Some("published") => PostSort::PublishedAt,
            _ => PostSort::UpdatedAt,
        };
        let params = PostListParams {
            page: query.page.max(1),
            per_page: query.per_page.unwrap_or(20).clamp(1, 100),
            status: query.status.map(PostStatus::as_str),
            search: query.search.as_deref(),
            sort,
        };
        let rows = self.repo.list(&params).await?;
        Ok(rows.into_iter().map(PostSummary::from_row).collect())
    }

    /// 发布/撤稿切换，不触碰正文。
    /// 与 save 同一条首次发布规则，updated_at 照常打点
    pub async fn set_status(&self, id: &str, status: PostStatus) -> Result<Post, ApiError> {
        let existing = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found(id))?;

        let now = Utc::now().to_rfc3339();
        let published_at = match (&existing.published_at, status) {
            (None, PostStatus::Published) => Some(now.clone()),
            _ => None,
        };

        self.repo
            .set_status(id, status.as_str(), published_at.as_deref(), &now)
            .await?;
        self.get(id).await
    }

    /// 硬删除，不留墓碑；图片等外部资源的清理是存储协作方的事
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let affected = self.repo.delete(id).await?;
        if affected == 0 {
            return Err(ApiError::not_found(id));
        }
        Ok(())
    }

    /// 浏览计数：单条原子 UPDATE，并发自增不丢更新
    pub async fn increment_views(&self, id: &str) -> Result<i64, ApiError> {
        self.repo
            .increment_views(id)
            .await?
            .ok_or_else(|| ApiError::not_found(id))
    }

    /// slug 可用性：排除正在编辑的文章自身。
    /// 检查与写入之间存在竞态，唯一索引才是最终裁决
    pub async fn slug_available(
        &self,
        slug: &str,
        excluding_id: Option<&str>,
    ) -> Result<bool, ApiError> {
        Ok(!self.repo.slug_exists(slug, excluding_id).await?)
    }
}

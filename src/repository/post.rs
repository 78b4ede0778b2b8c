use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// posts 表的一行。时间戳按约定存 RFC3339 文本
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub tags: String,
    pub category: Option<String>,
    pub featured: bool,
    pub read_time: i64,
    pub status: String,
    pub views: i64,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 列表页用的精简行，不含正文
#[derive(Debug, sqlx::FromRow)]
pub struct PostSummaryRow {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub category: Option<String>,
    pub featured: bool,
    pub read_time: i64,
    pub status: String,
    pub views: i64,
    pub published_at: Option<String>,
    pub updated_at: String,
}

/// 文章写入参数
pub struct PostWriteParams<'a> {
    pub id: &'a str,
    pub slug: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub excerpt: &'a str,
    pub author: &'a str,
    pub cover_image: Option<&'a str>,
    pub tags_json: &'a str,
    pub category: Option<&'a str>,
    pub featured: bool,
    pub read_time: i64,
    pub status: &'a str,
    pub published_at: Option<&'a str>,
    pub updated_at: &'a str,
}

/// 列表查询参数
#[derive(Debug, Default)]
pub struct PostListParams<'a> {
    pub page: u32,
    pub per_page: i64,
    pub status: Option<&'a str>,
    pub search: Option<&'a str>,
    pub sort: PostSort,
}

#[derive(Debug, Clone, Copy, Default)]
pub enum PostSort {
    #[default]
    UpdatedAt,
    PublishedAt,
    Views,
}

const SUMMARY_COLUMNS: &str = "id, slug, title, excerpt, author, category, featured, \
     read_time, status, views, published_at, updated_at";

#[derive(Clone)]
pub struct PostRepository {
    db: SqlitePool,
}

impl PostRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, p: &PostWriteParams<'_>, created_at: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO posts (id, slug, title, content, excerpt, author, cover_image, \
             tags, category, featured, read_time, status, views, published_at, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)",
        )
        .bind(p.id)
        .bind(p.slug)
        .bind(p.title)
        .bind(p.content)
        .bind(p.excerpt)
        .bind(p.author)
        .bind(p.cover_image)
        .bind(p.tags_json)
        .bind(p.category)
        .bind(p.featured)
        .bind(p.read_time)
        .bind(p.status)
        .bind(p.published_at)
        .bind(created_at)
        .bind(p.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// 更新不触碰 created_at 和 views
    pub async fn update(&self, p: &PostWriteParams<'_>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts SET slug = ?, title = ?, content = ?, excerpt = ?, author = ?, \
             cover_image = ?, tags = ?, category = ?, featured = ?, read_time = ?, \
             status = ?, published_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(p.slug)
        .bind(p.title)
        .bind(p.content)
        .bind(p.excerpt)
        .bind(p.author)
        .bind(p.cover_image)
        .bind(p.tags_json)
        .bind(p.category)
        .bind(p.featured)
        .bind(p.read_time)
        .bind(p.status)
        .bind(p.published_at)
        .bind(p.updated_at)
        .bind(p.id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn get(&self, id: &str) -> Result<Option<PostRow>, sqlx::Error> {
        sqlx::query_as::<_, PostRow>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    pub async fn list(&self, p: &PostListParams<'_>) -> Result<Vec<PostSummaryRow>, sqlx::Error> {
        let offset = (p.page.max(1) as i64 - 1) * p.per_page;

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SUMMARY_COLUMNS} FROM posts"));

        let mut has_where = false;
        if let Some(status) = p.status {
            qb.push(" WHERE status = ").push_bind(status);
            has_where = true;
        }
        if let Some(search) = p.search {
            qb.push(if has_where { " AND " } else { " WHERE " });
            qb.push("title LIKE ").push_bind(format!("%{search}%"));
        }

        qb.push(match p.sort {
            PostSort::UpdatedAt => " ORDER BY updated_at DESC",
            PostSort::PublishedAt => " ORDER BY published_at DESC",
            PostSort::Views => " ORDER BY views DESC",
        });
        qb.push(" LIMIT ").push_bind(p.per_page);
        qb.push(" OFFSET ").push_bind(offset);

        qb.build_query_as::<PostSummaryRow>().fetch_all(&self.db).await
    }

    /// 硬删除，返回受影响行数（0 表示目标不存在）
    pub async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }

    /// 发布状态切换。published_at 只在首次发布时传入 Some
    pub async fn set_status(
        &self,
        id: &str,
        status: &str,
        published_at: Option<&str>,
        updated_at: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = match published_at {
            Some(ts) => {
                sqlx::query(
                    "UPDATE posts SET status = ?, published_at = ?, updated_at = ? WHERE id = ?",
                )
                .bind(status)
                .bind(ts)
                .bind(updated_at)
                .bind(id)
                .execute(&self.db)
                .await?
            }
            None => {
                sqlx::query("UPDATE posts SET status = ?, updated_at = ? WHERE id = ?")
                    .bind(status)
                    .bind(updated_at)
                    .bind(id)
                    .execute(&self.db)
                    .await?
            }
        };
        Ok(result.rows_affected())
    }

    /// 原子自增浏览数并返回新值。自增在数据库端完成，
    /// 并发调用不会丢失更新；目标不存在时返回 None
    pub async fn increment_views(&self, id: &str) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE posts SET views = views + 1 WHERE id = ? RETURNING views",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    /// slug 可用性预检查。仅作提示，唯一索引才是最终权威
    pub async fn slug_exists(
        &self,
        slug: &str,
        excluding_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = match excluding_id {
            Some(id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE slug = ? AND id != ?")
                    .bind(slug)
                    .bind(id)
                    .fetch_one(&self.db)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE slug = ?")
                    .bind(slug)
                    .fetch_one(&self.db)
                    .await?
            }
        };
        Ok(count > 0)
    }

    /// 旧格式内容归一化后的回写：只更新 content，
    /// 不动 updated_at（这不是作者发起的修改）
    pub async fn update_content(&self, id: &str, content: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE posts SET content = ? WHERE id = ?")
            .bind(content)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

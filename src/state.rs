use crate::config::SiteConfig;
use crate::repository::PostRepository;
use crate::service::PostService;
use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<SiteConfig>,
}

impl AppState {
    pub async fn new(project_root: &Path, config: SiteConfig) -> Result<Self> {
        let db_path = project_root.join("mdblog.db");
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePool::connect(&db_url).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| anyhow::anyhow!("数据库迁移失败：{}", e))?;

        Ok(Self {
            db: pool,
            config: Arc::new(config),
        })
    }

    /// 按需构造文章服务，内部仅克隆连接池与配置引用
    pub fn posts(&self) -> PostService {
        PostService::new(PostRepository::new(self.db.clone()), self.config.clone())
    }
}

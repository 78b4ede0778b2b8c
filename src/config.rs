use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// 站点配置（mdblog.toml）。文件不存在时全部取默认值，
/// 进程启动时构造一次，此后只读传递，不再读取环境变量
#[derive(Debug, Default, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteInfo,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct SiteInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentConfig {
    /// 阅读速度（词/分钟），用于估算阅读时长
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: usize,
    /// 自动摘要截取的字符数
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,
    /// 编辑分类候选列表（编辑器下拉用，服务端不强约束）
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            words_per_minute: default_words_per_minute(),
            excerpt_length: default_excerpt_length(),
            categories: Vec::new(),
        }
    }
}

impl SiteConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("mdblog.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("配置文件解析失败（{}）：{}", path.display(), e))?;
        Ok(config)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6060
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_words_per_minute() -> usize {
    200
}

fn default_excerpt_length() -> usize {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = SiteConfig::load(Path::new("/nonexistent")).unwrap();
        assert_eq!(config.server.port, 6060);
        assert_eq!(config.content.words_per_minute, 200);
        assert_eq!(config.content.excerpt_length, 200);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_rest() {
        let config: SiteConfig = toml::from_str(
            r#"
            [site]
            title = "测试站点"

            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.site.title, "测试站点");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.content.categories.is_empty());
    }
}

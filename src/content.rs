pub mod derived;
pub mod legacy;
pub mod markdown;
pub mod slug;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

/// 存量内容的两种形态：本管线写入的内容一律是 Markdown 字符串，
/// 历史数据可能是早期富文本编辑器的结构化 JSON 文档。
/// Legacy 变体不出此模块边界，加载即归一化
#[derive(Debug)]
pub enum StoredContent {
    Markdown(String),
    Legacy(serde_json::Value),
}

impl StoredContent {
    /// 判定存储形态。只有整体解析为 {"type": "doc", ...} 对象时才视为旧格式，
    /// 其余一律按 Markdown 处理（包括恰好以 `{` 开头的普通文本）
    pub fn parse(raw: &str) -> Self {
        if raw.trim_start().starts_with('{')
            && let Ok(value) = serde_json::from_str::<serde_json::Value>(raw)
            && value.get("type").and_then(|t| t.as_str()) == Some("doc")
        {
            return Self::Legacy(value);
        }
        Self::Markdown(raw.to_string())
    }

    /// 归一化为 Markdown：字符串原样返回（不动点），旧格式走单向转换
    pub fn into_markdown(self) -> String {
        match self {
            Self::Markdown(s) => s,
            Self::Legacy(doc) => legacy::convert_document(&doc),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_passthrough_is_identity() {
        let source = "# 标题\n\n正文 **加粗**。";
        let once = StoredContent::parse(source).into_markdown();
        let twice = StoredContent::parse(&once).into_markdown();
        assert_eq!(once, source);
        assert_eq!(twice, source);
    }

    #[test]
    fn doc_object_detected_as_legacy() {
        let raw = r#"{"type":"doc","content":[]}"#;
        assert!(StoredContent::parse(raw).is_legacy());
    }

    #[test]
    fn plain_json_that_is_not_a_doc_stays_markdown() {
        let raw = r#"{"type":"note","content":[]}"#;
        assert!(!StoredContent::parse(raw).is_legacy());
        // 以 { 开头但不是合法 JSON 的文本同样按 Markdown 处理
        assert!(!StoredContent::parse("{ 这是一段普通文字").is_legacy());
    }

    #[test]
    fn status_round_trip() {
        assert_eq!(PostStatus::parse("draft"), Some(PostStatus::Draft));
        assert_eq!(PostStatus::parse("published"), Some(PostStatus::Published));
        assert_eq!(PostStatus::parse("archived"), None);
        assert_eq!(PostStatus::Published.as_str(), "published");
    }
}

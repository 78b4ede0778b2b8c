//! slug 的生成与格式校验。
//! 生成只是客户端未手动指定时的默认推导；服务端接受任何通过
//! 格式校验的 slug，全局唯一性由 posts.slug 的唯一索引兜底

use regex::Regex;
use std::sync::OnceLock;

pub const MAX_SLUG_LEN: usize = 200;

fn strip_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9\s-]").expect("slug 清洗正则无效"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("slug 空白正则无效"))
}

fn hyphen_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-{2,}").expect("slug 连字符正则无效"))
}

fn format_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("slug 校验正则无效"))
}

/// 由标题推导 slug：小写、修边、剥离非字母数字字符、
/// 空白折叠为单个连字符、连字符去重并去掉首尾
pub fn generate_slug(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = strip_pattern().replace_all(&lowered, "");
    let hyphenated = whitespace_runs().replace_all(&stripped, "-");
    let collapsed = hyphen_runs().replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// 格式校验：非空、不超长、只含小写字母/数字/连字符
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().count() <= MAX_SLUG_LEN && format_pattern().is_match(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_with_punctuation_and_padding() {
        assert_eq!(generate_slug("  Hello, World!!  "), "hello-world");
    }

    #[test]
    fn whitespace_runs_collapse_to_single_hyphen() {
        assert_eq!(generate_slug("Rust   异步  \t 编程"), "rust");
        assert_eq!(generate_slug("a  b\nc"), "a-b-c");
    }

    #[test]
    fn hyphen_runs_collapse_and_edges_trim() {
        assert_eq!(generate_slug("- pre -- mid -- post -"), "pre-mid-post");
        assert_eq!(generate_slug("--- "), "");
    }

    #[test]
    fn output_alphabet_is_always_url_safe() {
        for title in [
            "Ünïcödé Tîtle",
            "100% Rust!",
            "  Mixed___CASE  Title  ",
            "emoji 🎉 title",
        ] {
            let slug = generate_slug(title);
            assert!(
                slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "slug {slug:?} 含非法字符"
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            assert!(!slug.contains("--"));
        }
    }

    #[test]
    fn format_check_accepts_and_rejects() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("post-2024"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Hello-World"));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug("中文slug"));
        assert!(!is_valid_slug(&"a".repeat(201)));
    }
}

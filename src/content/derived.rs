//! 派生字段计算：阅读时长与自动摘要，都是内容的纯函数。
//! 阅读时长每次保存都重算；摘要只在作者未提供时派生

use regex::Regex;
use std::sync::OnceLock;

/// 阅读时长（分钟）：按空白切词计数，除以阅读速度向上取整，至少 1 分钟
pub fn read_time(markdown: &str, words_per_minute: usize) -> u32 {
    let wpm = words_per_minute.max(1);
    let words = markdown.split_whitespace().count();
    words.div_ceil(wpm).max(1) as u32
}

/// 自动摘要：取 Markdown 原文前 max_chars 个字符，剥离空白和单词字符之外的
/// 所有符号（Markdown 语法随标点一起被剥掉），修边后追加省略号。
/// 这只是个简单启发式，截断处的半截单词照单全收
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    static SYNTAX: OnceLock<Regex> = OnceLock::new();
    let re = SYNTAX.get_or_init(|| Regex::new(r"[^\w\s]").expect("摘要清洗正则无效"));

    let head: String = markdown.chars().take(max_chars).collect();
    let cleaned = re.replace_all(&head, "");
    format!("{}...", cleaned.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_time_rounds_up() {
        let words_450 = vec!["word"; 450].join(" ");
        assert_eq!(read_time(&words_450, 200), 3);

        let words_200 = vec!["word"; 200].join(" ");
        assert_eq!(read_time(&words_200, 200), 1);

        let words_201 = vec!["word"; 201].join(" ");
        assert_eq!(read_time(&words_201, 200), 2);
    }

    #[test]
    fn read_time_is_at_least_one_minute() {
        assert_eq!(read_time("", 200), 1);
        assert_eq!(read_time("   \n\t  ", 200), 1);
        assert_eq!(read_time("一个 词", 200), 1);
    }

    #[test]
    fn excerpt_strips_markdown_syntax() {
        let out = excerpt("# Hello **World**, welcome!", 200);
        assert_eq!(out, "Hello World welcome...");
    }

    #[test]
    fn excerpt_always_ends_with_ellipsis_and_caps_length() {
        let long = "word ".repeat(200);
        let out = excerpt(&long, 200);
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= 203);

        let short = excerpt("短文", 200);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn excerpt_cuts_before_cleaning() {
        // 截断按原文字符数计，截出的半截单词保留
        let source = "abcdef";
        assert_eq!(excerpt(source, 4), "abcd...");
    }
}

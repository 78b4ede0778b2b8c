//! Markdown 渲染，供编辑器预览接口使用。
//! 站点正式页面的渲染由前端/静态层负责，不走这里

use pulldown_cmark::{Options, Parser, html};

pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_blocks() {
        let html = render_markdown("## 标题\n\n一段 **加粗** 文本。");
        assert!(html.contains("<h2>标题</h2>"));
        assert!(html.contains("<strong>加粗</strong>"));
    }

    #[test]
    fn renders_fenced_code_with_language_class() {
        let html = render_markdown("```rust\nfn main() {}\n```");
        assert!(html.contains("language-rust"));
        assert!(html.contains("fn main()"));
    }

    #[test]
    fn renders_task_list_and_table() {
        let html = render_markdown("- [x] 完成\n\n| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<input"));
        assert!(html.contains("<table>"));
    }
}

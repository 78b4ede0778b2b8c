//! 旧版结构化文档（编辑器内部 JSON 树）到 Markdown 的单向转换。
//! 保存后旧格式即被取代，不要求无损；遇到缺字段或未识别的节点
//! 降级为纯文本提取并继续，转换本身永不失败

use serde_json::Value;

/// 转换整棵文档树。顶层应为 {"type":"doc","content":[...]}，
/// 结构不符时直接走纯文本提取兜底
pub fn convert_document(doc: &Value) -> String {
    match doc.get("content").and_then(Value::as_array) {
        Some(nodes) => render_blocks(nodes, 0),
        None => {
            tracing::warn!("旧文档缺少 content 数组，降级为纯文本提取");
            extract_text(doc)
        }
    }
}

/// 块级节点之间以空行分隔
fn render_blocks(nodes: &[Value], indent: usize) -> String {
    let blocks: Vec<String> = nodes
        .iter()
        .map(|node| render_block(node, indent))
        .filter(|block| !block.is_empty())
        .collect();
    blocks.join("\n\n")
}

fn render_block(node: &Value, indent: usize) -> String {
    let Some(kind) = node.get("type").and_then(Value::as_str) else {
        tracing::warn!("旧文档节点缺少 type 字段，降级为纯文本提取");
        return extract_text(node);
    };

    match kind {
        "heading" => {
            let level = node
                .pointer("/attrs/level")
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .clamp(1, 6) as usize;
            format!("{} {}", "#".repeat(level), render_inline_children(node))
        }
        "paragraph" => render_inline_children(node),
        "bulletList" => render_list(node, indent, None),
        "orderedList" => render_list(node, indent, Some(1)),
        "codeBlock" => {
            let lang = node
                .pointer("/attrs/language")
                .and_then(Value::as_str)
                .unwrap_or("");
            format!("```{lang}\n{}\n```", extract_text(node))
        }
        "blockquote" => {
            let inner = node
                .get("content")
                .and_then(Value::as_array)
                .map(|children| render_blocks(children, indent))
                .unwrap_or_default();
            inner
                .lines()
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n")
        }
        "horizontalRule" => "---".to_string(),
        other => {
            tracing::warn!("旧文档中出现未识别的节点类型 {other}，降级为纯文本提取");
            extract_text(node)
        }
    }
}

/// 列表渲染。有序列表忽略源文档的编号，从 1 重新顺序编号
fn render_list(node: &Value, indent: usize, ordered_from: Option<usize>) -> String {
    let Some(items) = node.get("content").and_then(Value::as_array) else {
        return extract_text(node);
    };

    let pad = "  ".repeat(indent);
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = match ordered_from {
                Some(start) => format!("{}. ", start + i),
                None => "- ".to_string(),
            };
            format!("{pad}{marker}{}", render_list_item(item, indent + 1))
        })
        .collect();
    lines.join("\n")
}

/// 列表项：段落内容与标记同行，嵌套列表换行后缩进一级。
/// 只保证一层嵌套的保真度，更深层级按相同规则尽力输出
fn render_list_item(item: &Value, indent: usize) -> String {
    let Some(children) = item.get("content").and_then(Value::as_array) else {
        return extract_text(item);
    };

    let mut out = String::new();
    for child in children {
        match child.get("type").and_then(Value::as_str) {
            Some("bulletList") | Some("orderedList") => {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&render_block(child, indent));
            }
            _ => {
                let text = render_block(child, indent);
                if !text.is_empty() {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(&text);
                }
            }
        }
    }
    out
}

fn render_inline_children(node: &Value) -> String {
    node.get("content")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(render_inline).collect())
        .unwrap_or_default()
}

fn render_inline(node: &Value) -> String {
    match node.get("type").and_then(Value::as_str) {
        Some("text") => {
            let text = node.get("text").and_then(Value::as_str).unwrap_or("");
            apply_marks(text, node.get("marks").and_then(Value::as_array))
        }
        Some("hardBreak") => "\n".to_string(),
        // 行内出现未识别节点同样降级为纯文本
        _ => extract_text(node),
    }
}

/// 按 marks 声明顺序由内向外包裹。互相冲突的组合不保证可往返，
/// 按声明顺序尽力输出
fn apply_marks(text: &str, marks: Option<&Vec<Value>>) -> String {
    let Some(marks) = marks else {
        return text.to_string();
    };

    let mut out = text.to_string();
    for mark in marks {
        match mark.get("type").and_then(Value::as_str) {
            Some("bold") => out = format!("**{out}**"),
            Some("italic") => out = format!("*{out}*"),
            Some("code") => out = format!("`{out}`"),
            Some("link") => {
                let href = mark
                    .pointer("/attrs/href")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                out = format!("[{out}]({href})");
            }
            _ => {}
        }
    }
    out
}

/// 兜底：递归拼接子树里所有 text 字段，只保文本（有损）
fn extract_text(node: &Value) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Value, out: &mut String) {
    if let Some(text) = node.get("text").and_then(Value::as_str) {
        out.push_str(text);
    }
    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            collect_text(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> Value {
        json!({ "type": "text", "text": s })
    }

    #[test]
    fn heading_and_paragraph() {
        let doc = json!({
            "type": "doc",
            "content": [
                { "type": "heading", "attrs": { "level": 2 }, "content": [text("Intro")] },
                { "type": "paragraph", "content": [text("Body text.")] },
            ]
        });
        assert_eq!(convert_document(&doc), "## Intro\n\nBody text.");
    }

    #[test]
    fn marks_wrap_in_declared_order() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [
                    { "type": "text", "text": "加粗", "marks": [{ "type": "bold" }] },
                    text("和"),
                    { "type": "text", "text": "斜体", "marks": [{ "type": "italic" }] },
                    { "type": "text", "text": "链接", "marks": [
                        { "type": "link", "attrs": { "href": "https://example.com" } }
                    ] },
                    { "type": "text", "text": "代码", "marks": [{ "type": "code" }] },
                ]
            }]
        });
        assert_eq!(
            convert_document(&doc),
            "**加粗**和*斜体*[链接](https://example.com)`代码`"
        );
    }

    #[test]
    fn stacked_marks_apply_inside_out() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [{
                    "type": "text",
                    "text": "both",
                    "marks": [{ "type": "bold" }, { "type": "italic" }]
                }]
            }]
        });
        assert_eq!(convert_document(&doc), "***both***");
    }

    #[test]
    fn bullet_list_one_item_per_line() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "bulletList",
                "content": [
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [text("第一项")] }
                    ] },
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [text("第二项")] }
                    ] },
                ]
            }]
        });
        assert_eq!(convert_document(&doc), "- 第一项\n- 第二项");
    }

    #[test]
    fn ordered_list_renumbers_from_one() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "orderedList",
                "attrs": { "start": 7 },
                "content": [
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [text("甲")] }
                    ] },
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [text("乙")] }
                    ] },
                ]
            }]
        });
        assert_eq!(convert_document(&doc), "1. 甲\n2. 乙");
    }

    #[test]
    fn nested_list_indents_one_level() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "bulletList",
                "content": [{
                    "type": "listItem",
                    "content": [
                        { "type": "paragraph", "content": [text("外层")] },
                        { "type": "bulletList", "content": [{
                            "type": "listItem",
                            "content": [
                                { "type": "paragraph", "content": [text("内层")] }
                            ]
                        }] }
                    ]
                }]
            }]
        });
        assert_eq!(convert_document(&doc), "- 外层\n  - 内层");
    }

    #[test]
    fn code_block_with_and_without_language() {
        let doc = json!({
            "type": "doc",
            "content": [
                { "type": "codeBlock", "attrs": { "language": "rust" },
                  "content": [text("fn main() {}")] },
                { "type": "codeBlock", "content": [text("plain")] },
            ]
        });
        assert_eq!(
            convert_document(&doc),
            "```rust\nfn main() {}\n```\n\n```\nplain\n```"
        );
    }

    #[test]
    fn blockquote_prefixes_every_line() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "blockquote",
                "content": [
                    { "type": "paragraph", "content": [text("第一段")] },
                    { "type": "paragraph", "content": [text("第二段")] },
                ]
            }]
        });
        assert_eq!(convert_document(&doc), "> 第一段\n> \n> 第二段");
    }

    #[test]
    fn hard_break_and_horizontal_rule() {
        let doc = json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [
                    text("上半句"),
                    { "type": "hardBreak" },
                    text("下半句"),
                ] },
                { "type": "horizontalRule" },
            ]
        });
        assert_eq!(convert_document(&doc), "上半句\n下半句\n\n---");
    }

    #[test]
    fn unknown_node_degrades_to_text() {
        let doc = json!({
            "type": "doc",
            "content": [{
                "type": "customWidget",
                "content": [
                    { "type": "paragraph", "content": [text("只剩"), text("文字")] }
                ]
            }]
        });
        assert_eq!(convert_document(&doc), "只剩文字");
    }

    #[test]
    fn malformed_node_does_not_panic() {
        let doc = json!({
            "type": "doc",
            "content": [
                { "content": [text("没有 type 的节点")] },
                { "type": "paragraph", "content": [text("正常段落")] },
            ]
        });
        assert_eq!(convert_document(&doc), "没有 type 的节点\n\n正常段落");
    }

    #[test]
    fn heading_without_attrs_defaults_to_h1() {
        let doc = json!({
            "type": "doc",
            "content": [
                { "type": "heading", "content": [text("无属性标题")] }
            ]
        });
        assert_eq!(convert_document(&doc), "# 无属性标题");
    }
}

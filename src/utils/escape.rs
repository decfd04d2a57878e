//! 标记转义：不可信字符串进入树/表格文本前的安全处理

/// 转义标记敏感字符，保证键名与字符串值只能作为字面文本展示
///
/// 树视图与表格视图的所有不可信文本（键名、字符串值、单元格）都经过
/// 此函数；原始视图输出标准JSON文本，不做额外转义。
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup_tags() {
        let escaped = escape_markup("<script>alert(1)</script>");
        assert!(!escaped.contains("<script>"), "转义后不应包含原始标签");
        assert_eq!(escaped, "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[test]
    fn test_escape_markup_quotes_and_amp() {
        assert_eq!(escape_markup(r#"a&b"c'd"#), "a&amp;b&quot;c&#39;d");
    }

    #[test]
    fn test_escape_markup_plain_text_unchanged() {
        assert_eq!(escape_markup("普通文本 plain"), "普通文本 plain");
        assert_eq!(escape_markup(""), "");
    }
}

//! 树视图渲染：把JSON值展开为带折叠状态的扁平行模型
//!
//! 渲染产物是纯数据：每行携带路径标识、缩进深度与已转义文本，
//! 折叠状态由行上的 expanded 标志承载，可见性单独一遍重算。

use serde_json::Value;

use crate::utils::escape::escape_markup;

/// JSON 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

/// 树视图中的一个显示行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    /// 节点路径标识（$ 根；闭合行沿用所属容器的路径）
    pub path: String,
    /// 缩进深度（根为0）
    pub depth: u32,
    /// 节点类型
    pub kind: NodeKind,
    /// 本行显示文本，键名与字符串值已转义，含括号与行尾逗号
    pub text: String,
    /// 是否带展开/折叠角标（非空容器的起始行）
    pub toggle: bool,
    /// 展开状态，仅对 toggle 行有意义
    pub expanded: bool,
    /// 是否为容器闭合行
    pub closer: bool,
    /// 是否可见（由展开状态重算）
    pub visible: bool,
}

fn kind_of(v: &Value) -> NodeKind {
    match v {
        Value::Object(_) => NodeKind::Object,
        Value::Array(_) => NodeKind::Array,
        Value::String(_) => NodeKind::String,
        Value::Number(_) => NodeKind::Number,
        Value::Bool(_) => NodeKind::Bool,
        Value::Null => NodeKind::Null,
    }
}

/// 原始值与空容器的字面文本
fn leaf_text(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", escape_markup(s)),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}

/// 从根值构建树视图的全部显示行，默认全部展开
pub fn build_render_rows(root: &Value) -> Vec<RenderRow> {
    fn child_path(parent: &str, key: &str) -> String {
        // 字段含特殊字符时使用 bracket-notation
        if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            format!("{}.{}", parent, key)
        } else {
            format!("{}['{}']", parent, key.replace('\'', "\\'"))
        }
    }

    fn walk(
        out: &mut Vec<RenderRow>,
        v: &Value,
        path: &str,
        key_label: Option<&str>,
        depth: u32,
        trailing_comma: bool,
    ) {
        let prefix = match key_label {
            Some(key) => format!("\"{}\": ", escape_markup(key)),
            None => String::new(),
        };
        let comma = if trailing_comma { "," } else { "" };

        match v {
            Value::Array(arr) if !arr.is_empty() => {
                out.push(RenderRow {
                    path: path.to_string(),
                    depth,
                    kind: NodeKind::Array,
                    text: format!("{}[", prefix),
                    toggle: true,
                    expanded: true,
                    closer: false,
                    visible: true,
                });
                let last = arr.len() - 1;
                for (idx, item) in arr.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, idx);
                    walk(out, item, &item_path, None, depth + 1, idx < last);
                }
                out.push(RenderRow {
                    path: path.to_string(),
                    depth,
                    kind: NodeKind::Array,
                    text: format!("]{}", comma),
                    toggle: false,
                    expanded: true,
                    closer: true,
                    visible: true,
                });
            }
            Value::Object(map) if !map.is_empty() => {
                out.push(RenderRow {
                    path: path.to_string(),
                    depth,
                    kind: NodeKind::Object,
                    text: format!("{}{{", prefix),
                    toggle: true,
                    expanded: true,
                    closer: false,
                    visible: true,
                });
                let last = map.len() - 1;
                for (idx, (key, child)) in map.iter().enumerate() {
                    let field_path = child_path(path, key);
                    walk(out, child, &field_path, Some(key.as_str()), depth + 1, idx < last);
                }
                out.push(RenderRow {
                    path: path.to_string(),
                    depth,
                    kind: NodeKind::Object,
                    text: format!("}}{}", comma),
                    toggle: false,
                    expanded: true,
                    closer: true,
                    visible: true,
                });
            }
            other => {
                out.push(RenderRow {
                    path: path.to_string(),
                    depth,
                    kind: kind_of(other),
                    text: format!("{}{}{}", prefix, leaf_text(other), comma),
                    toggle: false,
                    expanded: true,
                    closer: false,
                    visible: true,
                });
            }
        }
    }

    let mut out = Vec::with_capacity(64);
    walk(&mut out, root, "$", None, 0, false);
    out
}

/// 根据各容器的展开状态重算所有行的可见性
///
/// 折叠一个容器只隐藏它自己的内容块（子行与闭合行），兄弟与祖先
/// 容器互不影响；嵌套容器各自保持自己的折叠状态。
pub fn update_visibility_by_expansion(rows: &mut [RenderRow]) {
    // 栈顶为当前容器内部行的可见性（祖先链全部展开才为真）
    let mut stack: Vec<bool> = Vec::new();
    for row in rows.iter_mut() {
        if row.closer {
            let inside_visible = stack.pop().unwrap_or(true);
            row.visible = inside_visible;
        } else {
            let parent_visible = stack.last().copied().unwrap_or(true);
            row.visible = parent_visible;
            if row.toggle {
                stack.push(parent_visible && row.expanded);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(rows: &[RenderRow]) -> Vec<&str> {
        rows.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_primitive_root_single_row() {
        let rows = build_render_rows(&json!(42));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "42");
        assert_eq!(rows[0].path, "$");
        assert_eq!(rows[0].kind, NodeKind::Number);
        assert!(!rows[0].toggle, "原始值不应该有折叠角标");
    }

    #[test]
    fn test_null_and_bool_literals() {
        assert_eq!(build_render_rows(&json!(null))[0].text, "null");
        assert_eq!(build_render_rows(&json!(true))[0].text, "true");
        assert_eq!(build_render_rows(&json!(false))[0].text, "false");
    }

    #[test]
    fn test_empty_containers_no_toggle() {
        let rows = build_render_rows(&json!({}));
        assert_eq!(texts(&rows), vec!["{}"]);
        assert!(!rows[0].toggle, "空对象没有可展开内容");

        let rows = build_render_rows(&json!([]));
        assert_eq!(texts(&rows), vec!["[]"]);
        assert!(!rows[0].toggle, "空数组没有可展开内容");
    }

    #[test]
    fn test_object_rows_layout() {
        let rows = build_render_rows(&json!({"a": 1, "b": "x"}));
        assert_eq!(texts(&rows), vec!["{", "\"a\": 1,", "\"b\": \"x\"", "}"]);
        assert_eq!(rows[0].path, "$");
        assert_eq!(rows[1].path, "$.a");
        assert_eq!(rows[2].path, "$.b");
        assert!(rows[3].closer, "最后一行应该是闭合行");
        assert_eq!(rows[1].depth, 1);
    }

    #[test]
    fn test_array_rows_commas() {
        // 逗号跟在元素末行，最后一个元素无逗号
        let rows = build_render_rows(&json!([1, [2], 3]));
        assert_eq!(
            texts(&rows),
            vec!["[", "1,", "[", "2", "],", "3", "]"]
        );
        assert_eq!(rows[2].path, "$[1]");
        assert_eq!(rows[4].path, "$[1]");
        assert_eq!(rows[4].depth, 1, "闭合行与起始行同深度");
    }

    #[test]
    fn test_object_key_order_preserved() {
        let rows = build_render_rows(&json!({"b": 1, "a": 2}));
        assert_eq!(texts(&rows), vec!["{", "\"b\": 1,", "\"a\": 2", "}"], "键序应该按插入顺序保留");
    }

    #[test]
    fn test_special_key_paths_bracket_notation() {
        let rows = build_render_rows(&json!({"key with spaces": 1, "k'q": 2}));
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert!(paths.contains(&"$['key with spaces']"));
        assert!(paths.contains(&"$['k\\'q']"));
    }

    #[test]
    fn test_markup_escaped_in_rows() {
        let rows = build_render_rows(&json!({"x": "<script>", "<k>": 1}));
        for row in &rows {
            assert!(!row.text.contains("<script>"), "行文本不应该含未转义标签: {}", row.text);
            assert!(!row.text.contains("<k>"), "键名也应该转义: {}", row.text);
        }
        assert!(rows.iter().any(|r| r.text.contains("&lt;script&gt;")));
    }

    #[test]
    fn test_render_starts_fully_expanded() {
        let mut rows = build_render_rows(&json!({"a": {"b": [1, 2]}}));
        update_visibility_by_expansion(&mut rows);
        assert!(rows.iter().all(|r| r.visible), "新渲染应该全部展开可见");
        assert!(rows.iter().filter(|r| r.toggle).all(|r| r.expanded));
    }

    #[test]
    fn test_collapse_hides_only_own_content() {
        let mut rows = build_render_rows(&json!({"a": {"b": 1}, "c": 2}));
        // 折叠 $.a：其内容块（子行与闭合行）隐藏，兄弟 c 与根不受影响
        for row in rows.iter_mut() {
            if row.path == "$.a" && row.toggle {
                row.expanded = false;
            }
        }
        update_visibility_by_expansion(&mut rows);

        let visible_texts: Vec<&str> = rows.iter().filter(|r| r.visible).map(|r| r.text.as_str()).collect();
        assert_eq!(visible_texts, vec!["{", "\"a\": {", "\"c\": 2", "}"]);
    }

    #[test]
    fn test_nested_collapse_state_independent() {
        let mut rows = build_render_rows(&json!({"a": {"b": {"c": 1}}}));
        // 先折叠内层 $.a.b，再折叠外层 $.a，再展开外层：内层保持折叠
        for row in rows.iter_mut() {
            if row.path == "$.a.b" && row.toggle {
                row.expanded = false;
            }
        }
        for row in rows.iter_mut() {
            if row.path == "$.a" && row.toggle {
                row.expanded = false;
            }
        }
        update_visibility_by_expansion(&mut rows);
        assert!(!rows.iter().any(|r| r.visible && r.path.starts_with("$.a.b")));

        for row in rows.iter_mut() {
            if row.path == "$.a" && row.toggle {
                row.expanded = true;
            }
        }
        update_visibility_by_expansion(&mut rows);
        let b_open = rows.iter().find(|r| r.path == "$.a.b" && r.toggle).expect("应该存在$.a.b起始行");
        assert!(b_open.visible, "内层起始行随外层展开恢复可见");
        assert!(!b_open.expanded, "内层保持自己的折叠状态");
        let c_row = rows.iter().find(|r| r.path == "$.a.b.c").expect("应该存在$.a.b.c行");
        assert!(!c_row.visible, "内层内容仍然隐藏");
    }

    #[test]
    fn test_rendering_is_pure() {
        let v = json!({"用户": [{"id": 1}, {"id": 2}], "空": {}});
        assert_eq!(build_render_rows(&v), build_render_rows(&v), "同一输入两次渲染应该产出相同行");
    }
}

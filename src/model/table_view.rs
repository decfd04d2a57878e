//! 表格视图渲染：对象数组按键并集铺成表格，其余形态降级为提示文本

use serde_json::Value;

use crate::utils::escape::escape_markup;

/// 对象数组但对象内无属性时的提示
pub const MSG_NO_COLUMNS: &str = "数据为对象数组，但对象内无属性可供展示为表格。";
/// 数据形态不适用表格时的提示
pub const MSG_NOT_APPLICABLE: &str = "表格视图最适合展示对象数组。当前数据格式不适用。";

/// 单元格：已转义文本；嵌套容器以紧凑JSON呈现并标记为代码样式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub code: bool,
}

/// 表格视图的渲染结果：真正的表格，或一条降级提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<TableCell>>,
    },
    Placeholder(&'static str),
}

fn plain_cell(text: String) -> TableCell {
    TableCell { text, code: false }
}

/// 原始值在单元格中的转义文本形式
fn primitive_cell_text(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => escape_markup(s),
        // 容器由调用方先行分流
        other => escape_markup(&other.to_string()),
    }
}

/// 把JSON值渲染为表格视图
///
/// 适用形态：每个元素都是对象的非空数组。列集为所有元素键的并集，
/// 按首次出现顺序排列；某行缺失的键渲染为空单元格；值为容器的
/// 单元格渲染为紧凑JSON并标记代码样式。纯原始值数组降级为单列
/// 表，其余形态返回提示文本。对任意合法 `Value` 不失败。
pub fn build_table_view(value: &Value) -> TableView {
    let Value::Array(items) = value else {
        return TableView::Placeholder(MSG_NOT_APPLICABLE);
    };
    if items.is_empty() {
        return TableView::Placeholder(MSG_NOT_APPLICABLE);
    }

    if items.iter().all(|item| item.is_object()) {
        // 键并集，按元素顺序内的首次出现排序
        let mut columns: Vec<String> = Vec::new();
        for item in items {
            if let Value::Object(map) = item {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
        }
        if columns.is_empty() {
            return TableView::Placeholder(MSG_NO_COLUMNS);
        }

        let rows = items
            .iter()
            .map(|item| {
                columns
                    .iter()
                    .map(|key| match item.get(key) {
                        None => plain_cell(String::new()),
                        Some(v @ (Value::Array(_) | Value::Object(_))) => TableCell {
                            text: escape_markup(&v.to_string()),
                            code: true,
                        },
                        Some(v) => plain_cell(primitive_cell_text(v)),
                    })
                    .collect()
            })
            .collect();

        return TableView::Table {
            columns: columns.iter().map(|c| escape_markup(c)).collect(),
            rows,
        };
    }

    if items.iter().all(|item| !item.is_object() && !item.is_array()) {
        // 纯原始值数组：单列表格
        let rows = items
            .iter()
            .map(|item| vec![plain_cell(primitive_cell_text(item))])
            .collect();
        return TableView::Table {
            columns: vec!["Value".to_string()],
            rows,
        };
    }

    TableView::Placeholder(MSG_NOT_APPLICABLE)
}

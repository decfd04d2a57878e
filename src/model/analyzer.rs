//! 结构分析器：遍历JSON值图并汇总结构统计

use serde::Serialize;
use serde_json::Value;

use crate::model::data_core::AppError;

/// 结构统计记录（字段命名与解析服务的响应契约一致）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonStats {
    /// 全图所有对象自身键数之和（数组元素继续下钻，但数组本身计0）
    pub total_keys: usize,
    /// 最大嵌套深度，根为1；空容器不再下钻
    pub max_depth: usize,
    /// 全图数组节点总数（含根）
    pub array_count: usize,
    /// 全图对象节点总数（含根）
    pub object_count: usize,
    /// 各JSON类型出现次数
    pub data_types: TypeCounts,
    /// 紧凑序列化后的UTF-8字节数
    pub size_bytes: usize,
}

/// JSON类型出现次数统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub string: usize,
    pub number: usize,
    pub boolean: usize,
    pub null: usize,
    pub array: usize,
    pub object: usize,
}

/// 结构上限：文档准入时检查，超限返回可恢复错误而非无界递归
#[derive(Debug, Clone, Copy)]
pub struct StructureLimits {
    pub max_depth: usize,
    pub max_keys: usize,
}

impl Default for StructureLimits {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_keys: 1000,
        }
    }
}

/// 分析JSON值并返回结构统计
///
/// 对任意合法 `Value` 全函数、不失败。递归深度与输入嵌套深度同阶，
/// 对抗性深嵌套输入由准入端的 [`validate_structure`] 拦截。
pub fn analyze(value: &Value) -> JsonStats {
    fn count_arrays(v: &Value) -> usize {
        match v {
            Value::Array(arr) => 1 + arr.iter().map(count_arrays).sum::<usize>(),
            Value::Object(map) => map.values().map(count_arrays).sum(),
            _ => 0,
        }
    }
    fn count_objects(v: &Value) -> usize {
        match v {
            Value::Object(map) => 1 + map.values().map(count_objects).sum::<usize>(),
            Value::Array(arr) => arr.iter().map(count_objects).sum(),
            _ => 0,
        }
    }
    fn count_types(v: &Value, acc: &mut TypeCounts) {
        match v {
            Value::String(_) => acc.string += 1,
            Value::Number(_) => acc.number += 1,
            Value::Bool(_) => acc.boolean += 1,
            Value::Null => acc.null += 1,
            Value::Array(arr) => {
                acc.array += 1;
                for item in arr {
                    count_types(item, acc);
                }
            }
            Value::Object(map) => {
                acc.object += 1;
                for child in map.values() {
                    count_types(child, acc);
                }
            }
        }
    }

    let mut data_types = TypeCounts::default();
    count_types(value, &mut data_types);

    JsonStats {
        total_keys: count_keys(value),
        max_depth: json_depth(value, 1),
        array_count: count_arrays(value),
        object_count: count_objects(value),
        data_types,
        size_bytes: value.to_string().len(),
    }
}

/// 按配置上限校验文档结构，超限返回 [`AppError::Limit`]
pub fn validate_structure(value: &Value, limits: &StructureLimits) -> Result<(), AppError> {
    let depth = json_depth(value, 1);
    if depth > limits.max_depth {
        return Err(AppError::Limit(format!(
            "嵌套深度 {} 超过上限 {}",
            depth, limits.max_depth
        )));
    }

    let key_count = count_keys(value);
    if key_count > limits.max_keys {
        return Err(AppError::Limit(format!(
            "键总数 {} 超过上限 {}",
            key_count, limits.max_keys
        )));
    }

    Ok(())
}

/// 最大嵌套深度：非空容器为 1 + 子节点深度最大值，空容器与原始值取所在深度
fn json_depth(v: &Value, current: usize) -> usize {
    match v {
        Value::Object(map) => {
            if map.is_empty() {
                current
            } else {
                map.values()
                    .map(|child| json_depth(child, current + 1))
                    .max()
                    .unwrap_or(current)
            }
        }
        Value::Array(arr) => {
            if arr.is_empty() {
                current
            } else {
                arr.iter()
                    .map(|item| json_depth(item, current + 1))
                    .max()
                    .unwrap_or(current)
            }
        }
        _ => current,
    }
}

/// 全图对象自身键数之和
fn count_keys(v: &Value) -> usize {
    match v {
        Value::Object(map) => map.len() + map.values().map(count_keys).sum::<usize>(),
        Value::Array(arr) => arr.iter().map(count_keys).sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analyze_primitives() {
        for v in [json!(null), json!(42), json!("文本"), json!(true)] {
            let stats = analyze(&v);
            assert_eq!(stats.total_keys, 0);
            assert_eq!(stats.max_depth, 1, "原始值深度应该为1");
            assert_eq!(stats.array_count, 0);
            assert_eq!(stats.object_count, 0);
        }
    }

    #[test]
    fn test_analyze_empty_containers() {
        let stats = analyze(&json!({}));
        assert_eq!(
            (stats.total_keys, stats.max_depth, stats.array_count, stats.object_count),
            (0, 1, 0, 1),
            "空对象应该计为深度1的单个对象"
        );

        let stats = analyze(&json!([]));
        assert_eq!(
            (stats.total_keys, stats.max_depth, stats.array_count, stats.object_count),
            (0, 1, 1, 0),
            "空数组应该计为深度1的单个数组"
        );
    }

    #[test]
    fn test_analyze_nested_object() {
        let stats = analyze(&json!({"a": {"b": 1}}));
        assert_eq!(stats.total_keys, 2);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.array_count, 0);
        assert_eq!(stats.object_count, 2);
    }

    #[test]
    fn test_analyze_nested_arrays() {
        let stats = analyze(&json!([1, [2, [3]]]));
        assert_eq!(stats.array_count, 3);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.total_keys, 0);
        assert_eq!(stats.object_count, 0);
    }

    #[test]
    fn test_analyze_keys_inside_arrays() {
        // 数组本身不贡献键数，但其中的对象照常统计
        let stats = analyze(&json!({"items": [{"id": 1}, {"id": 2, "name": "甲"}]}));
        assert_eq!(stats.total_keys, 4, "应该统计到 items + id + id + name");
        assert_eq!(stats.object_count, 3);
        assert_eq!(stats.array_count, 1);
        assert_eq!(stats.max_depth, 4);
    }

    #[test]
    fn test_analyze_depth_at_least_one() {
        for v in [json!(null), json!({}), json!([[]]), json!({"a": []})] {
            assert!(analyze(&v).max_depth >= 1, "任意值的深度都应该≥1");
        }
    }

    #[test]
    fn test_analyze_type_counts() {
        let stats = analyze(&json!({"s": "x", "n": 1, "b": false, "z": null, "a": [1, 2]}));
        assert_eq!(stats.data_types.string, 1);
        assert_eq!(stats.data_types.number, 3);
        assert_eq!(stats.data_types.boolean, 1);
        assert_eq!(stats.data_types.null, 1);
        assert_eq!(stats.data_types.array, 1);
        assert_eq!(stats.data_types.object, 1);
    }

    #[test]
    fn test_analyze_size_bytes() {
        let v = json!({"键": "值"});
        let stats = analyze(&v);
        assert_eq!(stats.size_bytes, v.to_string().len());
        assert!(stats.size_bytes > 0);
    }

    #[test]
    fn test_stats_serialize_field_names() {
        // 序列化字段名沿用解析服务的响应契约
        let text = serde_json::to_string(&analyze(&json!({"a": 1}))).expect("统计序列化应该成功");
        for field in ["total_keys", "max_depth", "array_count", "object_count", "data_types", "size_bytes"] {
            assert!(text.contains(field), "序列化结果应该包含字段 {}", field);
        }
    }

    #[test]
    fn test_validate_structure_within_limits() {
        let v = json!({"a": {"b": [1, 2, 3]}});
        assert!(validate_structure(&v, &StructureLimits::default()).is_ok());
    }

    #[test]
    fn test_validate_structure_depth_exceeded() {
        // 12层嵌套数组，超过默认上限10
        let mut v = json!(1);
        for _ in 0..12 {
            v = json!([v]);
        }
        let err = validate_structure(&v, &StructureLimits::default());
        assert!(matches!(err, Err(AppError::Limit(_))), "超深结构应该返回Limit错误");
    }

    #[test]
    fn test_validate_structure_keys_exceeded() {
        let v = json!({"a": 1, "b": 2, "c": 3});
        let limits = StructureLimits {
            max_depth: 10,
            max_keys: 2,
        };
        assert!(matches!(validate_structure(&v, &limits), Err(AppError::Limit(_))));
    }

    #[test]
    fn test_validate_structure_custom_limits_allow_deep_input() {
        let mut v = json!(1);
        for _ in 0..12 {
            v = json!([v]);
        }
        let limits = StructureLimits {
            max_depth: 64,
            max_keys: 1000,
        };
        assert!(validate_structure(&v, &limits).is_ok(), "放宽上限后应该通过");
    }
}

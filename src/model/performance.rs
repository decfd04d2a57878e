//! 性能基准测试模块
//!
//! 用于测试大文档的结构分析与三种视图渲染的耗时
//! 遵循NFR要求：UI事件回路内的渲染与分析应在交互可接受的时间内完成

use std::time::Instant;

use serde_json::{json, Value};

use crate::model::analyzer::analyze;
use crate::model::render_tree::build_render_rows;
use crate::model::table_view::build_table_view;

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 生成大型测试JSON数据
pub fn generate_large_json(depth: usize, width: usize) -> Value {
    fn create_nested_object(current_depth: usize, max_depth: usize, width: usize) -> Value {
        if current_depth >= max_depth {
            return json!("叶子节点值");
        }

        let mut obj = serde_json::Map::new();

        // 混合各种类型的字段
        for i in 0..width {
            let key = format!("field_{}", i);
            let value = match i % 5 {
                0 => json!(format!("字符串值_{}", i)),
                1 => json!(i as i64),
                2 => json!(i % 2 == 0),
                3 => json!([1, 2, 3, i]),
                4 => create_nested_object(current_depth + 1, max_depth, width / 2),
                _ => json!(null),
            };
            obj.insert(key, value);
        }

        Value::Object(obj)
    }

    let mut root = serde_json::Map::new();
    root.insert(
        "metadata".to_string(),
        json!({
            "depth": depth,
            "width": width,
            "description": "性能测试用大型JSON文档"
        }),
    );

    root.insert("data".to_string(), create_nested_object(0, depth, width));

    // 表格视图的理想形态：对象数组
    let record_array: Vec<Value> = (0..width * 10)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("项目_{}", i),
                "value": i * 2,
                "active": i % 3 == 0
            })
        })
        .collect();
    root.insert("items".to_string(), json!(record_array));

    Value::Object(root)
}

/// 测试结构分析性能
pub fn benchmark_analyze(json_data: &Value) -> PerformanceResult {
    let start = Instant::now();
    let stats = analyze(json_data);
    let duration = start.elapsed();

    let details = format!(
        "键数 {} | 深度 {} | 数组 {} | 对象 {}",
        stats.total_keys, stats.max_depth, stats.array_count, stats.object_count
    );

    PerformanceResult::new("结构分析", duration.as_millis(), true, &details)
}

/// 测试树视图行构建性能
pub fn benchmark_tree_render(json_data: &Value) -> PerformanceResult {
    let start = Instant::now();
    let rows = build_render_rows(json_data);
    let duration = start.elapsed();

    let success = !rows.is_empty();
    let details = format!("生成了 {} 个显示行", rows.len());

    PerformanceResult::new("树视图构建", duration.as_millis(), success, &details)
}

/// 测试表格视图构建性能（针对文档中的对象数组）
pub fn benchmark_table_render(json_data: &Value) -> PerformanceResult {
    let target = json_data.get("items").unwrap_or(json_data);

    let start = Instant::now();
    let view = build_table_view(target);
    let duration = start.elapsed();

    let details = match &view {
        crate::model::table_view::TableView::Table { columns, rows } => {
            format!("{} 列 x {} 行", columns.len(), rows.len())
        }
        crate::model::table_view::TableView::Placeholder(msg) => format!("降级: {}", msg),
    };

    PerformanceResult::new("表格视图构建", duration.as_millis(), true, &details)
}

/// 测试JSON解析性能
pub fn benchmark_json_parsing(json_str: &str) -> PerformanceResult {
    let start = Instant::now();
    let parse_result = serde_json::from_str::<Value>(json_str);
    let duration = start.elapsed();

    match parse_result {
        Ok(_) => PerformanceResult::new(
            "JSON解析",
            duration.as_millis(),
            true,
            &format!("解析了 {} 字节的JSON", json_str.len()),
        ),
        Err(e) => PerformanceResult::new(
            "JSON解析",
            duration.as_millis(),
            false,
            &format!("解析失败: {}", e),
        ),
    }
}

/// 运行综合性能测试
pub fn run_performance_suite() -> Vec<PerformanceResult> {
    let mut results = Vec::new();

    // 测试不同规模的数据
    let test_cases = [
        (3, 10), // 小型：深度3，宽度10
        (4, 20), // 中型：深度4，宽度20
        (5, 30), // 大型：深度5，宽度30
    ];

    for (depth, width) in test_cases {
        println!("测试规模：深度{}，宽度{}", depth, width);

        let start = Instant::now();
        let json_data = generate_large_json(depth, width);
        let generation_time = start.elapsed();

        results.push(PerformanceResult::new(
            &format!("数据生成({}x{})", depth, width),
            generation_time.as_millis(),
            true,
            &format!("生成了深度{}宽度{}的JSON", depth, width),
        ));

        let start = Instant::now();
        let json_str = serde_json::to_string(&json_data).unwrap();
        let serialization_time = start.elapsed();

        results.push(PerformanceResult::new(
            &format!("JSON序列化({}x{})", depth, width),
            serialization_time.as_millis(),
            true,
            &format!("序列化了 {} 字节", json_str.len()),
        ));

        results.push(benchmark_json_parsing(&json_str));
        results.push(benchmark_analyze(&json_data));
        results.push(benchmark_tree_render(&json_data));
        results.push(benchmark_table_render(&json_data));
    }

    results
}

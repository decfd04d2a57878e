//! 性能基准演示：对不同规模的合成JSON运行分析与渲染基准

use json_jiexi::model::performance::run_performance_suite;

fn main() {
    let results = run_performance_suite();

    println!("\n=== 性能测试结果 ===");
    for r in &results {
        let flag = if r.success { "通过" } else { "失败" };
        println!(
            "[{}] {} - {}ms ({})",
            flag, r.operation, r.duration_ms, r.details
        );
    }
}

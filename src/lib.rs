//! JSON解析器核心库
//!
//! 提供JSON结构统计、三种视图（树形/原始/表格）渲染与展开/折叠交互状态
//! 遵循MVVM架构模式，引擎层为纯函数、不依赖UI

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::analyzer::{analyze, validate_structure, JsonStats, StructureLimits, TypeCounts};
pub use model::data_core::{render, AppError, AppState, RenderedView, ViewMode};
pub use model::render_tree::{build_render_rows, NodeKind, RenderRow};
pub use model::table_view::{build_table_view, TableCell, TableView};

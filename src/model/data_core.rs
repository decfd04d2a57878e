//! AppState：应用核心状态、视图渲染分发与展开/折叠交互

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::model::analyzer::{analyze, validate_structure, JsonStats, StructureLimits};
use crate::model::render_tree::{build_render_rows, update_visibility_by_expansion, RenderRow};
use crate::model::table_view::{build_table_view, TableView};
use crate::utils::fs::read_json_file;

/// 视图模式：树形 / 原始 / 表格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Tree,
    Raw,
    Table,
}

/// 一次渲染的产物，三种互斥表示
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedView {
    Tree(Vec<RenderRow>),
    Raw(String),
    Table(TableView),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("结构超限: {0}")]
    Limit(String),
    #[error("状态错误: {0}")]
    State(String),
}

/// 按指定模式渲染JSON值
///
/// 对任意合法 `Value` 全函数、不失败：树视图与表格视图对封闭的
/// 值类型做穷尽匹配，原始视图是标准的2空格缩进JSON序列化。
pub fn render(value: &Value, mode: ViewMode) -> RenderedView {
    match mode {
        ViewMode::Tree => {
            let mut rows = build_render_rows(value);
            update_visibility_by_expansion(&mut rows);
            RenderedView::Tree(rows)
        }
        ViewMode::Raw => {
            RenderedView::Raw(serde_json::to_string_pretty(value).unwrap_or_default())
        }
        ViewMode::Table => RenderedView::Table(build_table_view(value)),
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub source_path: Option<PathBuf>,
    /// 最近一次成功获得的文档（成功即整体覆盖，无合并）
    pub dom: Option<Value>,
    /// 当前统计；外部提供的记录优先于本地分析
    pub stats: Option<JsonStats>,
    pub view_mode: ViewMode,
    /// 当前显示产物
    pub view: Option<RenderedView>,
    pub limits: StructureLimits,
}

impl AppState {
    /// 文档准入点：校验结构上限后覆盖存储并按当前模式重新渲染
    ///
    /// 外部协作方（示例数据、文件加载、文本解析）统一经由此处交付
    /// 已解析的文档；`stats` 为 `Some` 时按外部记录采用，跳过本地分析。
    pub fn set_document(&mut self, value: Value, stats: Option<JsonStats>) -> Result<(), AppError> {
        validate_structure(&value, &self.limits)?;

        let stats = stats.unwrap_or_else(|| analyze(&value));
        tracing::info!(
            "文档准入成功: 键数 {}，深度 {}，{} 字节",
            stats.total_keys,
            stats.max_depth,
            stats.size_bytes
        );
        self.stats = Some(stats);
        self.view = Some(render(&value, self.view_mode));
        self.dom = Some(value);
        Ok(())
    }

    /// 加载JSON文件并准入
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        let dom = read_json_file(p)?;
        self.set_document(dom, None)?;
        self.source_path = Some(p.to_path_buf());
        Ok(())
    }

    /// 解析输入文本并准入；解析失败时清空存储的文档与统计
    pub fn parse_text(&mut self, text: &str) -> Result<(), AppError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::State("未提供JSON数据".into()));
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(v) => self.set_document(v, None),
            Err(e) => {
                self.dom = None;
                self.stats = None;
                self.view = None;
                Err(e.into())
            }
        }
    }

    /// 切换视图模式并重新渲染
    ///
    /// 有存储文档时直接重渲染（树视图重新从全展开开始）；没有时
    /// 回退为本地解析当前输入文本渲染，失败则静默保持原显示。
    /// 返回显示内容是否更新。
    pub fn switch_mode(&mut self, mode: ViewMode, raw_input: &str) -> bool {
        self.view_mode = mode;

        if let Some(dom) = &self.dom {
            self.view = Some(render(dom, mode));
            return true;
        }

        match serde_json::from_str::<Value>(raw_input.trim()) {
            Ok(v) => {
                // 回退渲染不写入存储、不改动统计
                self.view = Some(render(&v, mode));
                true
            }
            Err(_) => false,
        }
    }

    /// 切换指定路径容器的展开状态，返回新的展开状态
    ///
    /// 只翻转该容器自身的内容块可见性，兄弟与祖先容器不受影响。
    pub fn toggle_node(&mut self, path: &str) -> Option<bool> {
        let Some(RenderedView::Tree(rows)) = &mut self.view else {
            return None;
        };

        let mut new_state = None;
        for row in rows.iter_mut() {
            if row.toggle && row.path == path {
                row.expanded = !row.expanded;
                new_state = Some(row.expanded);
                break;
            }
        }
        if new_state.is_some() {
            update_visibility_by_expansion(rows);
        }
        new_state
    }

    /// 树视图中当前可见的行
    pub fn visible_rows(&self) -> Vec<&RenderRow> {
        match &self.view {
            Some(RenderedView::Tree(rows)) => rows.iter().filter(|r| r.visible).collect(),
            _ => Vec::new(),
        }
    }

    /// 存储文档的格式化JSON文本（用于剪贴板导出）
    pub fn pretty_document(&self) -> Result<String, AppError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| AppError::State("文档尚未加载".into()))?;
        Ok(serde_json::to_string_pretty(dom)?)
    }

    /// 恢复初始状态（保留结构上限配置）
    pub fn clear(&mut self) {
        *self = AppState {
            limits: self.limits,
            ..AppState::default()
        };
    }
}

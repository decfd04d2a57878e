//! 程序入口：初始化日志、加载 Slint UI，并绑定 VM 回调

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

slint::include_modules!();

mod model;
mod utils;
mod vm;

use model::data_core::{AppState, RenderedView, ViewMode};
use model::render_tree::RenderRow;
use model::table_view::{TableCell, TableView};
use vm::bridge::*;
use std::time::Instant;

// TreeRowData转换实现
impl From<&RenderRow> for TreeRowData {
    /// 将引擎显示行转换为Slint可用的数据结构
    fn from(row: &RenderRow) -> Self {
        Self {
            path: row.path.clone().into(),
            text: row.text.clone().into(),
            depth: row.depth as i32,
            has_toggle: row.toggle,
            expanded: row.expanded,
        }
    }
}

fn mode_index(mode: ViewMode) -> i32 {
    match mode {
        ViewMode::Tree => 0,
        ViewMode::Raw => 1,
        ViewMode::Table => 2,
    }
}

fn mode_from_index(index: i32) -> ViewMode {
    match index {
        1 => ViewMode::Raw,
        2 => ViewMode::Table,
        _ => ViewMode::Tree,
    }
}

/// VM桥接器：管理UI与数据层的交互
struct ViewModelBridge {
    app_state: Rc<RefCell<AppState>>,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(app_window: &AppWindow, app_state: Rc<RefCell<AppState>>) -> Self {
        let bridge = Self { app_state };
        bridge.setup_callbacks(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        let app_state = self.app_state.clone();

        // === 解析输入文本回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_parse_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_parse_pressed(&app_window, &app_state);
                }
            });
        }

        // === 打开文件回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_open_file_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_open_file(&app_window, &app_state);
                }
            });
        }

        // === 加载示例回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_load_sample_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_load_sample(&app_window, &app_state);
                }
            });
        }

        // === 清空回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_clear_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_clear_pressed(&app_window, &app_state);
                }
            });
        }

        // === 复制按钮回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_copy_pressed(&app_window, &app_state);
                }
            });
        }

        // === 视图模式切换回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_switch_view_mode(move |mode_idx| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_switch_view_mode(&app_window, &app_state, mode_idx);
                }
            });
        }

        // === 节点展开/折叠回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_node(move |node_path| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_toggle_node(&app_window, &app_state, &node_path.to_string());
                }
            });
        }
    }

    /// 初始化UI状态
    fn initialize_ui(&self, app_window: &AppWindow) {
        app_window.set_status_message(STATUS_READY.into());
        app_window.set_status_error(false);
        app_window.set_current_path("".into());
        app_window.set_view_mode(mode_index(ViewMode::Tree));
        app_window.set_stats_visible(false);
        app_window.set_display_error("".into());
        app_window.set_table_placeholder("".into());

        // 设置空的树模型
        let empty_model = ModelRc::new(VecModel::<TreeRowData>::default());
        app_window.set_tree_model(empty_model);
    }

    /// 显示文件选择对话框
    fn show_file_dialog() -> Option<PathBuf> {
        use rfd::FileDialog;

        let file_path = FileDialog::new()
            .add_filter("JSON文件", &["json"])
            .add_filter("所有文件", &["*"])
            .set_title("选择要查看的JSON文件")
            .pick_file();

        match file_path {
            Some(path) => {
                tracing::info!("用户选择了文件: {}", path.display());
                Some(path)
            }
            None => {
                tracing::info!("用户取消了文件选择");
                None
            }
        }
    }

    /// 处理"解析JSON"：解析输入区文本并准入
    fn handle_parse_pressed(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        let input = app_window.get_input_text().to_string();
        app_window.set_status_message(STATUS_PARSING.into());
        app_window.set_status_error(false);

        let start_time = Instant::now();
        let result = app_state.borrow_mut().parse_text(&input);
        match result {
            Ok(()) => {
                Self::refresh_display(app_window, app_state);
                app_window.set_status_message(STATUS_PARSED.into());
                tracing::info!("输入解析成功，耗时: {:.1}ms", start_time.elapsed().as_millis());
            }
            Err(e) => {
                // 失败状态同样刷新：清空后的显示 + 行内错误说明
                Self::refresh_display(app_window, app_state);
                app_window.set_display_error(format!("解析错误: {}", e).into());
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
                app_window.set_status_error(true);
                tracing::error!("输入解析失败: {}", e);
            }
        }
    }

    /// 处理打开文件操作
    fn handle_open_file(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        let file_path = match Self::show_file_dialog() {
            Some(path) => path,
            None => {
                app_window.set_status_message("未选择文件".into());
                return;
            }
        };

        app_window.set_status_message(STATUS_LOADING.into());
        app_window.set_status_error(false);

        let start_time = Instant::now();
        let load_result = app_state.borrow_mut().load_file(&file_path);
        match load_result {
            Ok(()) => {
                let load_duration = start_time.elapsed();

                // 输入区同步为文档的格式化文本
                if let Ok(pretty) = app_state.borrow().pretty_document() {
                    app_window.set_input_text(pretty.into());
                }
                Self::refresh_display(app_window, app_state);

                app_window.set_current_path(file_path.to_string_lossy().to_string().into());
                app_window.set_status_message(STATUS_LOADED.into());
                tracing::info!(
                    "文件加载成功: {}，耗时: {:.1}ms",
                    file_path.display(),
                    load_duration.as_millis()
                );
            }
            Err(e) => {
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
                app_window.set_status_error(true);
                tracing::error!("文件加载失败: {}", e);
            }
        }
    }

    /// 处理加载示例数据
    fn handle_load_sample(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        let sample = sample_document();

        let result = app_state.borrow_mut().set_document(sample, None);
        match result {
            Ok(()) => {
                if let Ok(pretty) = app_state.borrow().pretty_document() {
                    app_window.set_input_text(pretty.into());
                }
                Self::refresh_display(app_window, app_state);
                app_window.set_current_path("".into());
                app_window.set_status_message(STATUS_SAMPLE_LOADED.into());
                app_window.set_status_error(false);
                tracing::info!("示例数据加载成功");
            }
            Err(e) => {
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
                app_window.set_status_error(true);
                tracing::error!("示例数据加载失败: {}", e);
            }
        }
    }

    /// 处理清空：输入、显示、统计与存储文档全部复位
    fn handle_clear_pressed(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        app_state.borrow_mut().clear();

        app_window.set_input_text("".into());
        app_window.set_current_path("".into());
        Self::refresh_display(app_window, app_state);
        app_window.set_status_message(STATUS_CLEARED.into());
        app_window.set_status_error(false);
        tracing::info!("显示与状态已清空");
    }

    /// 处理复制按钮操作：复制存储文档的格式化JSON
    fn handle_copy_pressed(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        let content = match app_state.borrow().pretty_document() {
            Ok(text) => text,
            Err(e) => {
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
                app_window.set_status_error(true);
                return;
            }
        };

        match utils::clipboard::copy_to_clipboard(&content) {
            Ok(()) => {
                app_window.set_status_message(STATUS_COPIED.into());
                app_window.set_status_error(false);
                tracing::info!("内容已复制到剪贴板，长度: {} 字符", content.len());
            }
            Err(e) => {
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
                app_window.set_status_error(true);
                tracing::error!("复制失败: {}", e);
            }
        }
    }

    /// 处理视图模式切换
    fn handle_switch_view_mode(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<AppState>>,
        mode_idx: i32,
    ) {
        let mode = mode_from_index(mode_idx);
        let raw_input = app_window.get_input_text().to_string();

        let updated = app_state.borrow_mut().switch_mode(mode, &raw_input);

        // 模式指示总是更新；显示内容仅在渲染成功时更新
        app_window.set_view_mode(mode_idx);
        if updated {
            Self::refresh_display(app_window, app_state);
        }
        tracing::info!("视图模式切换: {:?}，显示更新: {}", mode, updated);
    }

    /// 处理节点展开/折叠
    fn handle_toggle_node(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<AppState>>,
        node_path: &str,
    ) {
        let toggled = app_state.borrow_mut().toggle_node(node_path);
        let Some(expanded) = toggled else {
            return;
        };

        Self::push_tree_model(app_window, app_state);

        let action = if expanded { "展开" } else { "折叠" };
        app_window.set_status_message(format!("{}: {}", action, node_path).into());
        tracing::info!("节点{}: {}", action, node_path);
    }

    /// 把树视图的可见行推送到UI模型
    fn push_tree_model(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        let tree_data: Vec<TreeRowData> = {
            let state = app_state.borrow();
            state.visible_rows().into_iter().map(TreeRowData::from).collect()
        };
        app_window.set_tree_model(ModelRc::new(VecModel::from(tree_data)));
    }

    /// 按AppState当前内容刷新统计与显示区
    fn refresh_display(app_window: &AppWindow, app_state: &Rc<RefCell<AppState>>) {
        app_window.set_display_error("".into());

        // 统计面板
        {
            let state = app_state.borrow();
            match &state.stats {
                Some(stats) => {
                    app_window.set_stat_total_keys(stats.total_keys.to_string().into());
                    app_window.set_stat_max_depth(stats.max_depth.to_string().into());
                    app_window.set_stat_array_count(stats.array_count.to_string().into());
                    app_window.set_stat_object_count(stats.object_count.to_string().into());
                    app_window.set_stats_visible(true);
                }
                None => {
                    app_window.set_stats_visible(false);
                }
            }
            app_window.set_view_mode(mode_index(state.view_mode));
        }

        // 显示区
        let view = app_state.borrow().view.clone();
        match view {
            Some(RenderedView::Tree(_)) => {
                Self::push_tree_model(app_window, app_state);
            }
            Some(RenderedView::Raw(text)) => {
                app_window.set_raw_text(text.into());
            }
            Some(RenderedView::Table(table)) => {
                Self::push_table_model(app_window, &table);
            }
            None => {
                app_window.set_tree_model(ModelRc::new(VecModel::<TreeRowData>::default()));
                app_window.set_raw_text("".into());
                Self::push_table_model(app_window, &TableView::Placeholder(""));
            }
        }
    }

    /// 把表格视图推送到UI模型
    fn push_table_model(app_window: &AppWindow, table: &TableView) {
        match table {
            TableView::Table { columns, rows } => {
                let column_model: Vec<SharedString> =
                    columns.iter().map(|c| SharedString::from(c.as_str())).collect();
                let row_models: Vec<ModelRc<SharedString>> = rows
                    .iter()
                    .map(|cells| {
                        let texts: Vec<SharedString> = cells
                            .iter()
                            .map(|cell: &TableCell| SharedString::from(cell.text.as_str()))
                            .collect();
                        ModelRc::new(VecModel::from(texts))
                    })
                    .collect();

                app_window.set_table_placeholder("".into());
                app_window.set_table_columns(ModelRc::new(VecModel::from(column_model)));
                app_window.set_table_rows(ModelRc::new(VecModel::from(row_models)));
            }
            TableView::Placeholder(msg) => {
                app_window.set_table_placeholder(SharedString::from(*msg));
                app_window.set_table_columns(ModelRc::new(VecModel::<SharedString>::default()));
                app_window
                    .set_table_rows(ModelRc::new(VecModel::<ModelRc<SharedString>>::default()));
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let app = AppWindow::new().map_err(|e| anyhow::anyhow!("UI 初始化失败: {}", e))?;
    let state = Rc::new(RefCell::new(AppState::default()));

    // 创建VM桥接器并绑定UI回调
    let bridge = ViewModelBridge::new(&app, state.clone());
    bridge.initialize_ui(&app);

    tracing::info!("应用启动成功，UI已初始化");
    app.run().map_err(|e| anyhow::anyhow!("事件循环异常退出: {}", e))?;
    Ok(())
}

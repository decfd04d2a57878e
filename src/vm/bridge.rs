//! VM桥接层：连接Slint UI与AppState数据模型
//!
//! 注意：此模块的具体实现在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供公共常量与内置示例文档

use serde_json::{json, Value};

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_PARSING: &str = "正在解析JSON数据...";
pub const STATUS_PARSED: &str = "JSON数据解析成功";
pub const STATUS_LOADING: &str = "正在加载文件...";
pub const STATUS_LOADED: &str = "文件加载和解析成功";
pub const STATUS_SAMPLE_LOADED: &str = "示例数据加载成功";
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_CLEARED: &str = "已清空";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

/// 内置示例文档（"加载示例"协作方交付的已解析JSON）
pub fn sample_document() -> Value {
    json!({
        "用户信息": {
            "姓名": "张三",
            "年龄": 28,
            "职业": "全栈开发工程师",
            "技能": ["JavaScript", "Python", "Django", "React"],
            "联系方式": {
                "邮箱": "zhangsan@example.com",
                "电话": "138-0000-1234"
            }
        },
        "项目经验": [
            {
                "项目名称": "电商平台",
                "技术栈": ["Django", "PostgreSQL", "Redis"],
                "状态": "已完成"
            },
            {
                "项目名称": "数据分析系统",
                "技术栈": ["Python", "Pandas", "Django REST Framework"],
                "状态": "进行中"
            }
        ],
        "配置": {
            "主题": "dark",
            "语言": "zh-CN",
            "通知": true,
            "数据同步": false
        }
    })
}

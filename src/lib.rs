// ==========================================
// 收银核对系统 - 核心库
// ==========================================
// 职责: 根据库存导出文件, 找出收银系统标记需要调整的商品
// 流程: 配置解析 → 导入映射 → 规则引擎 → 导出
// 系统定位: 只生成建议, 由人工导入收银系统
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - config.json
pub mod config;

// 导入层 - 库存导出文本
pub mod importer;

// 引擎层 - 同步规则
pub mod engine;

// 导出层 - 分号分隔文本
pub mod export;

// API 层 - 核对用例
pub mod api;

// 应用层 - CLI / Web 控制器
pub mod app;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AppMode, TargetStatus};

// 领域实体
pub use domain::{Article, ChangeProposal, ImportWarning};

// 配置
pub use config::{load_config, resolve, ResolvedConfig};

// 引擎
pub use engine::{FilterStats, SyncRuleEngine};

// API
pub use api::{ApiError, SyncApi, SyncReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "收银标记核对工具";

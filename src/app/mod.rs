// ==========================================
// 收银核对系统 - 应用层
// ==========================================
// 职责: 控制器, 连接用户（命令行 / 浏览器）与 API 层
// ==========================================

pub mod cli;
pub mod web;

// 重导出
pub use cli::{find_latest_csv, CliController, CliOutcome};
pub use web::{build_router, run_server, WebError, WebState};

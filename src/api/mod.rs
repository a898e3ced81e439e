// ==========================================
// 收银核对系统 - API 层
// ==========================================
// 职责: 提供核对用例接口, 供 CLI 与 Web 控制器调用
// ==========================================

pub mod error;
pub mod sync_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use sync_api::{SyncApi, SyncReport};

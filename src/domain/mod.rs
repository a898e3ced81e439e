// ==========================================
// 收银核对系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、状态规则
// 红线: 不含文件访问逻辑, 不含过滤流程
// ==========================================

pub mod article;
pub mod types;

// 重导出核心类型
pub use article::{Article, ChangeProposal, ImportWarning, PIECE_UNIT};
pub use types::{AppMode, InvalidModeError, TargetStatus};

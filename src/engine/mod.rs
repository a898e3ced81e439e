// ==========================================
// 收银核对系统 - 引擎层
// ==========================================
// 职责: 实现业务规则, 不做文件读写
// 红线: 每个未生成建议的商品都有明确的判定原因
// ==========================================

pub mod sync_rules;

// 重导出核心引擎
pub use sync_rules::{FilterStats, RuleDecision, SyncOutcome, SyncRuleEngine};

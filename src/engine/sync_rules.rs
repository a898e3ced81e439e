// ==========================================
// 收银核对系统 - 同步规则引擎
// ==========================================
// 红线: 纯函数, 不修改输入, 不做任何 I/O
// ==========================================
// 职责: 排除过滤 + 目标状态计算 + 单位过滤 + 仅正向过滤
// 输入: Article 列表 + ResolvedConfig
// 输出: ChangeProposal 列表（保持输入顺序）+ 各过滤器统计
// ==========================================

use crate::config::ResolvedConfig;
use crate::domain::{Article, ChangeProposal, TargetStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

// ==========================================
// RuleDecision - 单个商品的判定结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleDecision {
    Excluded,             // 在排除列表中
    NoAction,             // 状态一致, 无需操作
    PieceUnitSuppressed,  // 计件单位被过滤
    NonPositiveSuppressed, // 非 "yes" 建议被过滤
    Proposed(TargetStatus),
}

// ==========================================
// FilterStats - 各过滤阶段的计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub total: usize,
    pub excluded: usize,
    pub no_action: usize,
    pub piece_unit_suppressed: usize,
    pub non_positive_suppressed: usize,
    pub proposed: usize,
}

impl FilterStats {
    fn record(&mut self, decision: RuleDecision) {
        self.total += 1;
        match decision {
            RuleDecision::Excluded => self.excluded += 1,
            RuleDecision::NoAction => self.no_action += 1,
            RuleDecision::PieceUnitSuppressed => self.piece_unit_suppressed += 1,
            RuleDecision::NonPositiveSuppressed => self.non_positive_suppressed += 1,
            RuleDecision::Proposed(_) => self.proposed += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncOutcome {
    pub proposals: Vec<ChangeProposal>,
    pub stats: FilterStats,
}

// ==========================================
// SyncRuleEngine - 同步规则引擎
// ==========================================
pub struct SyncRuleEngine<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> SyncRuleEngine<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    /// 判定单个商品
    ///
    /// # 顺序（遇到第一个不通过的条件即停止）
    /// 1. 排除列表
    /// 2. 目标状态计算
    /// 3. 计件单位过滤
    /// 4. 仅正向过滤
    pub fn evaluate(&self, article: &Article) -> RuleDecision {
        if self.config.is_excluded(&article.id) {
            return RuleDecision::Excluded;
        }

        let target_status = match article.compute_target_status() {
            Some(status) => status,
            None => return RuleDecision::NoAction,
        };

        if self.config.suppress_piece_units && article.is_piece_unit() {
            return RuleDecision::PieceUnitSuppressed;
        }

        if self.config.only_positive_changes && target_status != TargetStatus::Yes {
            return RuleDecision::NonPositiveSuppressed;
        }

        RuleDecision::Proposed(target_status)
    }

    /// 对整批商品执行同步规则
    #[instrument(skip(self, articles), fields(total = articles.len()))]
    pub fn execute(&self, articles: &[Article]) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();

        for article in articles {
            let decision = self.evaluate(article);
            outcome.stats.record(decision);

            match decision {
                RuleDecision::Proposed(status) => {
                    outcome
                        .proposals
                        .push(ChangeProposal::from_article(article, status));
                }
                other => {
                    debug!(article_id = %article.id, decision = ?other, "商品未生成建议");
                }
            }
        }

        info!(
            proposed = outcome.stats.proposed,
            excluded = outcome.stats.excluded,
            no_action = outcome.stats.no_action,
            piece_unit_suppressed = outcome.stats.piece_unit_suppressed,
            non_positive_suppressed = outcome.stats.non_positive_suppressed,
            "同步规则执行完成"
        );
        outcome
    }
}

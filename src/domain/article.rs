// ==========================================
// 收银核对系统 - 商品领域模型
// ==========================================
// 职责: 商品实体 / 变更建议 / 导入警告
// 红线: 实体构造后不可变, 状态计算为纯函数
// ==========================================

use crate::domain::types::TargetStatus;
use serde::{Deserialize, Serialize};

/// 具有特殊含义的计件单位
pub const PIECE_UNIT: &str = "Stück";

// ==========================================
// Article - 库存导出中的一行商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,            // 商品编号（保持字符串, 允许前导零）
    pub name: String,          // 显示名称
    pub stock_level: f64,      // 库存数量（可为负）
    pub is_pos_enabled: bool,  // 当前是否为收银商品
    pub unit: String,          // 计量单位
    pub barcode: String,       // 条码（可为空）
    pub external_number: String, // 外部编号（可为空）
}

impl Article {
    /// 计算目标收银状态
    ///
    /// # 规则（按顺序判定）
    /// 1. 有库存 且 未启用 → Yes
    /// 2. 无库存（含 0 与负数）且 已启用 → No
    /// 3. 其他 → None（无需操作）
    pub fn compute_target_status(&self) -> Option<TargetStatus> {
        if self.stock_level > 0.0 && !self.is_pos_enabled {
            return Some(TargetStatus::Yes);
        }

        if self.stock_level <= 0.0 && self.is_pos_enabled {
            return Some(TargetStatus::No);
        }

        None
    }

    pub fn is_piece_unit(&self) -> bool {
        self.unit == PIECE_UNIT
    }
}

// ==========================================
// ChangeProposal - 收银标志变更建议
// ==========================================
// 生命周期: 仅在一次核对运行内
// JSON 字段名与导出列名一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeProposal {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub barcode: String,
    #[serde(rename = "extnr")]
    pub external_number: String,
    pub target_status: TargetStatus,
    pub unit: String, // 不一定导出, 用于下游过滤与报表
}

impl ChangeProposal {
    pub fn from_article(article: &Article, target_status: TargetStatus) -> Self {
        Self {
            name: article.name.clone(),
            id: article.id.clone(),
            barcode: article.barcode.clone(),
            external_number: article.external_number.clone(),
            target_status,
            unit: article.unit.clone(),
        }
    }
}

// ==========================================
// ImportWarning - 行级可恢复错误
// ==========================================
// 用途: 映射失败的行被跳过, 以结构化形式返回给调用方
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportWarning {
    pub row_number: usize,          // 数据行号（从 1 开始, 不含表头）
    pub article_id: String,         // 商品编号（可能为空）
    pub raw_value: Option<String>,  // 出错的原始值
    pub message: String,            // 错误描述
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(stock_level: f64, is_pos_enabled: bool) -> Article {
        Article {
            id: "0042".to_string(),
            name: "Apfelsaft".to_string(),
            stock_level,
            is_pos_enabled,
            unit: "Liter".to_string(),
            barcode: String::new(),
            external_number: String::new(),
        }
    }

    #[test]
    fn test_in_stock_not_enabled_should_enable() {
        assert_eq!(article(5.0, false).compute_target_status(), Some(TargetStatus::Yes));
        assert_eq!(article(0.001, false).compute_target_status(), Some(TargetStatus::Yes));
    }

    #[test]
    fn test_out_of_stock_enabled_should_disable() {
        assert_eq!(article(-1.0, true).compute_target_status(), Some(TargetStatus::No));
    }

    #[test]
    fn test_zero_stock_boundary() {
        // 0 视为无库存
        assert_eq!(article(0.0, true).compute_target_status(), Some(TargetStatus::No));
        assert_eq!(article(0.0, false).compute_target_status(), None);
    }

    #[test]
    fn test_consistent_state_needs_no_action() {
        assert_eq!(article(3.0, true).compute_target_status(), None);
        assert_eq!(article(-2.0, false).compute_target_status(), None);
    }

    #[test]
    fn test_nan_stock_needs_no_action() {
        assert_eq!(article(f64::NAN, true).compute_target_status(), None);
        assert_eq!(article(f64::NAN, false).compute_target_status(), None);
    }

    #[test]
    fn test_piece_unit() {
        let mut a = article(1.0, false);
        assert!(!a.is_piece_unit());
        a.unit = PIECE_UNIT.to_string();
        assert!(a.is_piece_unit());
    }

    #[test]
    fn test_proposal_carries_display_fields() {
        let mut a = article(1.0, false);
        a.barcode = "9001234567890".to_string();
        a.external_number = "EXT-7".to_string();

        let p = ChangeProposal::from_article(&a, TargetStatus::Yes);
        assert_eq!(p.id, "0042");
        assert_eq!(p.name, "Apfelsaft");
        assert_eq!(p.barcode, "9001234567890");
        assert_eq!(p.external_number, "EXT-7");
        assert_eq!(p.unit, "Liter");
        assert_eq!(p.target_status, TargetStatus::Yes);
    }

    #[test]
    fn test_proposal_json_uses_export_column_names() {
        let proposal = ChangeProposal::from_article(&article(3.0, false), TargetStatus::Yes);
        let json = serde_json::to_value(&proposal).unwrap();

        assert_eq!(json["Name"], "Apfelsaft");
        assert_eq!(json["ID"], "0042");
        assert_eq!(json["extnr"], "");
        assert_eq!(json["target_status"], "yes");
        assert!(json.get("external_number").is_none());
    }
}

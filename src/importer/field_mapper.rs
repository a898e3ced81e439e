// ==========================================
// 收银核对系统 - 字段映射器实现
// ==========================================
// 职责: 原始行记录 → Article
// 红线: 单行失败只跳过该行, 不中断整批
// ==========================================

use crate::domain::{Article, ImportWarning};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FieldMapper, RawRow};
use serde::Serialize;
use tracing::{info, warn};

/// 库存导出的列名
pub mod columns {
    pub const ID: &str = "ID";
    pub const NAME: &str = "name";
    pub const STOCK_LEVEL: &str = "lagerstand";
    pub const POS_FLAG: &str = "kassaartikel";
    pub const UNIT: &str = "einheit";
    pub const BARCODE: &str = "barcode";
    pub const EXTERNAL_NUMBER: &str = "extnr";
}

/// 库存列整体缺失时使用的值
const MISSING_STOCK_LEVEL: &str = "0";

/// 批量映射结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct MappingOutcome {
    pub articles: Vec<Article>,
    pub warnings: Vec<ImportWarning>,
}

pub struct ArticleMapper {
    cleaner: DataCleaner,
}

impl Default for ArticleMapper {
    fn default() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }
}

impl FieldMapper for ArticleMapper {
    fn map_to_article(&self, row: &RawRow, row_number: usize) -> ImportResult<Article> {
        let raw_stock = row
            .get(columns::STOCK_LEVEL)
            .map(String::as_str)
            .unwrap_or(MISSING_STOCK_LEVEL);

        let stock_level = self.cleaner.parse_stock_level(raw_stock).map_err(|e| {
            ImportError::TypeConversionError {
                row: row_number,
                field: columns::STOCK_LEVEL.to_string(),
                value: raw_stock.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Article {
            id: self.cleaner.text_or_empty(row.get(columns::ID)),
            name: self.cleaner.text_or_empty(row.get(columns::NAME)),
            stock_level,
            is_pos_enabled: self
                .cleaner
                .parse_pos_flag(row.get(columns::POS_FLAG).map(String::as_str)),
            unit: self.cleaner.text_or_empty(row.get(columns::UNIT)),
            barcode: self.cleaner.text_or_empty(row.get(columns::BARCODE)),
            external_number: self.cleaner.text_or_empty(row.get(columns::EXTERNAL_NUMBER)),
        })
    }
}

impl ArticleMapper {
    /// 批量映射, 失败行记录警告后跳过
    pub fn map_rows(&self, rows: &[RawRow]) -> MappingOutcome {
        let mut outcome = MappingOutcome::default();

        for (idx, row) in rows.iter().enumerate() {
            let row_number = idx + 1;
            match self.map_to_article(row, row_number) {
                Ok(article) => outcome.articles.push(article),
                Err(e) => {
                    let article_id = self.cleaner.text_or_empty(row.get(columns::ID));
                    let raw_value = match &e {
                        ImportError::TypeConversionError { value, .. } => Some(value.clone()),
                        _ => None,
                    };
                    warn!(
                        row_number = row_number,
                        article_id = %article_id,
                        error = %e,
                        "商品映射失败, 已跳过该行"
                    );
                    outcome.warnings.push(ImportWarning {
                        row_number,
                        article_id,
                        raw_value,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            success = outcome.articles.len(),
            skipped = outcome.warnings.len(),
            "字段映射完成"
        );
        outcome
    }
}

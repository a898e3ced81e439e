// ==========================================
// 收银核对系统 - 导入管道 Trait
// ==========================================
// 职责: 定义导入各阶段接口（不包含实现）
// ==========================================

use crate::domain::Article;
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

/// 原始行记录（列名 → 单元格文本）
pub type RawRow = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 表格文本 → 原始行记录
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（已跳过空行）
    /// - Err: 文件不存在、格式不支持、编码错误
    fn parse_file(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;

    /// 解析内存中的文本（例如 HTTP 上传内容）
    fn parse_str(&self, content: &str) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 原始行记录 → Article
// 实现者: ArticleMapper
pub trait FieldMapper: Send + Sync {
    /// 映射单行
    ///
    /// # 参数
    /// - row: 原始行记录
    /// - row_number: 行号（用于警告信息）
    ///
    /// # 返回
    /// - Err: 库存数量无法解析（调用方跳过该行）
    fn map_to_article(&self, row: &RawRow, row_number: usize) -> ImportResult<Article>;
}

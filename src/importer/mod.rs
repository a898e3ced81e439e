// ==========================================
// 收银核对系统 - 导入层
// ==========================================
// 职责: 库存导出文本 → Article 实体
// 流程: 解析 → 清洗 → 映射（失败行跳过并记录警告）
// ==========================================

pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{columns, ArticleMapper, MappingOutcome};
pub use file_parser::{decode_utf8, strip_bom, CsvParser, CSV_DELIMITER};

// 重导出 Trait 接口
pub use importer_trait::{FieldMapper, FileParser, RawRow};

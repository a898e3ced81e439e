// ==========================================
// 收银核对系统 - 导出层
// ==========================================
// 职责: 建议列表 → 分号分隔文本（文件 / HTTP 下载）
// ==========================================

pub mod error;
pub mod formatter;
pub mod writer;

pub use error::{ExportError, ExportResult};
pub use formatter::{
    export_fields, sanitize, sanitize_value, serialize, to_records, ExportRecord,
    FORMULA_PREFIXES,
};
pub use writer::{download_file_name, ExportWriter, TIMESTAMP_FORMAT};

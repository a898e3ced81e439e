// ==========================================
// 收银核对系统 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("未指定导出字段且没有可推断字段的记录")]
    MissingFields,

    #[error("CSV 写入失败: {0}")]
    CsvWriteError(String),

    #[error("文件写入失败 ({path}): {message}")]
    FileWriteError { path: String, message: String },
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;

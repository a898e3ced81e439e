// ==========================================
// 收银核对系统 - API层错误类型
// ==========================================
// 职责: 把导入/导出层的技术错误转换为调用方可展示的错误
// 展示层（CLI / Web）据此决定提示文本或 HTTP 状态码
// ==========================================

use crate::export::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误（拒绝本次请求, 进程继续运行）
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("文件中没有有效的商品数据")]
    EmptyDataset,

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("上传内容超过大小上限 ({limit} 字节)")]
    PayloadTooLarge { limit: usize },

    // ==========================================
    // 处理错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_) | ApiError::EmptyDataset => 400,
            ApiError::NotFound(_) => 404,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::ImportError(_) | ApiError::ExportError(_) | ApiError::InternalError(_) => {
                500
            }
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件不存在: {}", path)),
            ImportError::UnsupportedFormat(_)
            | ImportError::EncodingError(_)
            | ImportError::CsvParseError(_)
            | ImportError::TypeConversionError { .. } => ApiError::InvalidInput(err.to_string()),
            ImportError::FileReadError(_) => ApiError::ImportError(err.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

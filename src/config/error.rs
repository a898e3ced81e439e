// ==========================================
// 收银核对系统 - 配置错误类型
// ==========================================
// 说明: 配置错误均可恢复, 加载器捕获后回落到默认值
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    NotFound(String),

    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件 JSON 解析失败 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置文件顶层必须是 JSON 对象: {0}")]
    NotAnObject(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

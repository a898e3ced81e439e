// ==========================================
// 收银核对系统 - 领域类型定义
// ==========================================
// 职责: 目标状态 / 运行模式
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 目标状态 (Target Status)
// ==========================================
// 只有两个取值; "无需操作" 通过不生成建议来表达
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Yes, // 应启用收银
    No,  // 应停用收银
}

impl TargetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetStatus::Yes => "yes",
            TargetStatus::No => "no",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 运行模式 (App Mode)
// ==========================================
// 在组合根解析一次, 决定启动哪个展示层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Local, // 命令行
    Web,   // HTTP 服务
}

impl AppMode {
    pub const ALL: [AppMode; 2] = [AppMode::Local, AppMode::Web];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Local => "local",
            AppMode::Web => "web",
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知模式
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("无效的运行模式: '{0}'")]
pub struct InvalidModeError(pub String);

impl FromStr for AppMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(AppMode::Local),
            "web" => Ok(AppMode::Web),
            other => Err(InvalidModeError(other.to_string())),
        }
    }
}

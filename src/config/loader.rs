// ==========================================
// 收银核对系统 - 配置加载
// ==========================================
// 职责: 定位配置文件 → 读取 JSON → 交给解析器
// 红线: 任何读取失败都回落到完整默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::resolver::{resolve, ResolvedConfig};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV_VAR: &str = "POS_SYNC_CONFIG";

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// 加载结果
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: ResolvedConfig,
    pub source: PathBuf,
    pub warnings: Vec<String>,
}

/// 获取配置文件路径
///
/// # 顺序
/// 1. 环境变量 POS_SYNC_CONFIG
/// 2. 当前目录下的 config.json
/// 3. 用户配置目录下的 pos-stock-sync/config.json
/// 4. 都不存在时返回当前目录下的 config.json（按默认值运行）
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return local;
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("pos-stock-sync").join(DEFAULT_CONFIG_FILE);
        if user.exists() {
            return user;
        }
    }

    local
}

/// 读取原始配置对象
pub fn read_raw_config(path: &Path) -> ConfigResult<Map<String, Value>> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(ConfigError::NotFound(display));
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: display.clone(),
        message: e.to_string(),
    })?;

    let value: Value = serde_json::from_str(content.trim_start_matches('\u{feff}')).map_err(
        |e| ConfigError::ParseError {
            path: display.clone(),
            message: e.to_string(),
        },
    )?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject(display)),
    }
}

/// 加载并解析配置（永不失败）
pub fn load_config(path: &Path) -> ConfigLoad {
    let mut warnings = Vec::new();

    let raw = match read_raw_config(path) {
        Ok(map) => map,
        Err(ConfigError::NotFound(p)) => {
            info!(path = %p, "未找到配置文件, 使用默认配置");
            Map::new()
        }
        Err(e) => {
            warn!(error = %e, "配置读取失败, 使用默认配置");
            warnings.push(e.to_string());
            Map::new()
        }
    };

    ConfigLoad {
        config: resolve(&raw),
        source: path.to_path_buf(),
        warnings,
    }
}

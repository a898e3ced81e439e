// ==========================================
// 收银核对系统 - 配置层
// ==========================================
// 职责: 读取 config.json, 与默认值合并
// 存储: 单个 JSON 文件, 每次运行重新读取
// ==========================================

pub mod error;
pub mod loader;
pub mod resolver;

// 重导出
pub use error::{ConfigError, ConfigResult};
pub use loader::{default_config_path, load_config, read_raw_config, ConfigLoad, CONFIG_ENV_VAR};
pub use resolver::{config_keys, defaults, is_truthy, resolve, ResolvedConfig};

// ==========================================
// 收银核对系统 - 配置解析器
// ==========================================
// 职责: 用户配置 + 固定默认值 → 完整配置
// 红线: 永不因配置格式问题失败, 未知键原样保留
// ==========================================

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::warn;

// ==========================================
// 配置键与默认值
// ==========================================
pub mod config_keys {
    // 核对规则
    pub const EXCLUDE_IDS: &str = "exclude_ids";
    pub const SUPPRESS_PIECE_UNITS: &str = "suppress_piece_units";
    pub const ONLY_POSITIVE_CHANGES: &str = "only_positive_changes";

    // 组合根
    pub const MODE: &str = "mode";

    // 文件路径
    pub const DATA_DIR: &str = "data_dir";
    pub const OUTPUT_DIR: &str = "output_dir";
    pub const OUTPUT_BASE_NAME: &str = "output_base_name";
    pub const INCLUDE_UNIT_COLUMN: &str = "include_unit_column";

    // Web 模式
    pub const WEB_DOWNLOAD_POSTFIX: &str = "web_download_postfix";
    pub const WEB_BIND_ADDRESS: &str = "web_bind_address";
    pub const MAX_UPLOAD_BYTES: &str = "max_upload_bytes";
}

pub mod defaults {
    pub const MODE: &str = "local";
    pub const DATA_DIR: &str = "data";
    pub const OUTPUT_DIR: &str = "output";
    pub const OUTPUT_BASE_NAME: &str = "artikel_vorschlaege.csv";
    pub const WEB_DOWNLOAD_POSTFIX: &str = "vorschlaege_IN_KASSA";
    pub const WEB_BIND_ADDRESS: &str = "0.0.0.0:8000";
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
}

/// 配置键别名（旧版配置文件使用的德文键名）
fn aliases(key: &str) -> &'static [&'static str] {
    match key {
        config_keys::EXCLUDE_IDS => &["ausschluss_ids"],
        config_keys::SUPPRESS_PIECE_UNITS => {
            &["stueckartikel_aussortieren", "stückartikel_nicht_ausgeben"]
        }
        config_keys::ONLY_POSITIVE_CHANGES => &["nur_ja_ausgeben", "nur_Änderungen_zu_JA_ausgeben"],
        config_keys::WEB_DOWNLOAD_POSTFIX => &["postfix_outputdatei_web"],
        _ => &[],
    }
}

const RECOGNIZED_KEYS: [&str; 11] = [
    config_keys::EXCLUDE_IDS,
    config_keys::SUPPRESS_PIECE_UNITS,
    config_keys::ONLY_POSITIVE_CHANGES,
    config_keys::MODE,
    config_keys::DATA_DIR,
    config_keys::OUTPUT_DIR,
    config_keys::OUTPUT_BASE_NAME,
    config_keys::INCLUDE_UNIT_COLUMN,
    config_keys::WEB_DOWNLOAD_POSTFIX,
    config_keys::WEB_BIND_ADDRESS,
    config_keys::MAX_UPLOAD_BYTES,
];

// ==========================================
// ResolvedConfig - 完整配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    // ===== 核对规则 =====
    pub exclude_ids: BTreeSet<String>, // 永不生成建议的商品编号
    pub suppress_piece_units: bool,    // 丢弃单位为 "Stück" 的建议
    pub only_positive_changes: bool,   // 只保留 "yes" 建议

    // ===== 组合根 =====
    pub mode: String, // 原始模式字符串, 由 main 解析为 AppMode

    // ===== 导出 =====
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_base_name: String,
    pub include_unit_column: bool,

    // ===== Web =====
    pub web_download_postfix: String,
    pub web_bind_address: String,
    pub max_upload_bytes: usize,

    // ===== 未识别的键 =====
    pub extra: Map<String, Value>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            exclude_ids: BTreeSet::new(),
            suppress_piece_units: false,
            only_positive_changes: false,
            mode: defaults::MODE.to_string(),
            data_dir: PathBuf::from(defaults::DATA_DIR),
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            output_base_name: defaults::OUTPUT_BASE_NAME.to_string(),
            include_unit_column: true,
            web_download_postfix: defaults::WEB_DOWNLOAD_POSTFIX.to_string(),
            web_bind_address: defaults::WEB_BIND_ADDRESS.to_string(),
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
            extra: Map::new(),
        }
    }
}

impl ResolvedConfig {
    /// 商品编号是否在排除列表中
    pub fn is_excluded(&self, article_id: &str) -> bool {
        self.exclude_ids.contains(article_id)
    }
}

/// 按键逐个合并用户配置与默认值
///
/// # 说明
/// - 缺失的键取默认值
/// - 布尔选项接受 true/false 与 0/1, 任何真值视为启用
/// - exclude_ids 中的数字统一转为字符串
/// - 类型不符的值记录警告后回落到默认值
pub fn resolve(raw: &Map<String, Value>) -> ResolvedConfig {
    let mut config = ResolvedConfig::default();

    if let Some(v) = lookup(raw, config_keys::EXCLUDE_IDS) {
        config.exclude_ids = coerce_ids(v);
    }
    if let Some(v) = lookup(raw, config_keys::SUPPRESS_PIECE_UNITS) {
        config.suppress_piece_units = is_truthy(v);
    }
    if let Some(v) = lookup(raw, config_keys::ONLY_POSITIVE_CHANGES) {
        config.only_positive_changes = is_truthy(v);
    }
    if let Some(v) = lookup(raw, config_keys::INCLUDE_UNIT_COLUMN) {
        config.include_unit_column = is_truthy(v);
    }

    if let Some(s) = string_value(raw, config_keys::MODE) {
        config.mode = s;
    }
    if let Some(s) = string_value(raw, config_keys::DATA_DIR) {
        config.data_dir = PathBuf::from(s);
    }
    if let Some(s) = string_value(raw, config_keys::OUTPUT_DIR) {
        config.output_dir = PathBuf::from(s);
    }
    if let Some(s) = string_value(raw, config_keys::OUTPUT_BASE_NAME) {
        config.output_base_name = s;
    }
    if let Some(s) = string_value(raw, config_keys::WEB_DOWNLOAD_POSTFIX) {
        config.web_download_postfix = s;
    }
    if let Some(s) = string_value(raw, config_keys::WEB_BIND_ADDRESS) {
        config.web_bind_address = s;
    }

    if let Some(v) = lookup(raw, config_keys::MAX_UPLOAD_BYTES) {
        match v.as_u64().and_then(|n| usize::try_from(n).ok()) {
            Some(n) if n > 0 => config.max_upload_bytes = n,
            _ => warn!(
                key = config_keys::MAX_UPLOAD_BYTES,
                value = %v,
                "配置值不是正整数, 使用默认值"
            ),
        }
    }

    config.extra = raw
        .iter()
        .filter(|(k, _)| !is_recognized(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    config
}

fn is_recognized(key: &str) -> bool {
    RECOGNIZED_KEYS
        .iter()
        .any(|k| *k == key || aliases(k).contains(&key))
}

/// 查找配置值, 主键优先, 其次别名
fn lookup<'a>(raw: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    raw.get(key)
        .or_else(|| aliases(key).iter().find_map(|alias| raw.get(*alias)))
}

fn string_value(raw: &Map<String, Value>, key: &str) -> Option<String> {
    match lookup(raw, key)? {
        Value::String(s) => Some(s.clone()),
        other => {
            warn!(key = key, value = %other, "配置值不是字符串, 使用默认值");
            None
        }
    }
}

/// 真值判定
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "" | "0" | "false" | "no" | "nein" | "off"
        ),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// 排除列表统一为字符串集合
fn coerce_ids(value: &Value) -> BTreeSet<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(id_to_string).collect(),
        Value::Null => BTreeSet::new(),
        Value::String(_) | Value::Number(_) => {
            warn!(
                key = config_keys::EXCLUDE_IDS,
                value = %value,
                "排除列表应为数组, 按单个编号处理"
            );
            id_to_string(value).into_iter().collect()
        }
        other => {
            warn!(key = config_keys::EXCLUDE_IDS, value = %other, "排除列表格式错误, 已忽略");
            BTreeSet::new()
        }
    }
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

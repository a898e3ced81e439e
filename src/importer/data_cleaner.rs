// ==========================================
// 收银核对系统 - 数据清洗器实现
// ==========================================
// 职责: 小数点标准化 / 收银标志解析 / 空值处理
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    /// 逗号小数 → 点小数（"5,5" → "5.5"）
    pub fn normalize_decimal(&self, value: &str) -> String {
        value.trim().replace(',', ".")
    }

    /// 解析库存数量
    ///
    /// # 返回
    /// - Err: 原始文本无法解析为浮点数（含空字符串）
    pub fn parse_stock_level(&self, value: &str) -> Result<f64, std::num::ParseFloatError> {
        self.normalize_decimal(value).parse::<f64>()
    }

    /// 收银标志: 只有字面量 "1" 为真
    pub fn parse_pos_flag(&self, value: Option<&str>) -> bool {
        matches!(value.map(str::trim), Some("1"))
    }

    /// 可选文本字段, 缺失时为空字符串（不去除空白, 编号原样导出）
    pub fn text_or_empty(&self, value: Option<&String>) -> String {
        value.cloned().unwrap_or_default()
    }
}

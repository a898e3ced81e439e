// ==========================================
// 收银核对系统 - 导出格式化器
// ==========================================
// 职责: 建议 → 扁平记录 → 防注入 → 分号分隔文本
// 红线: 文件导出与 HTTP 下载共用同一序列化逻辑
// ==========================================

use crate::domain::ChangeProposal;
use crate::export::error::{ExportError, ExportResult};
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use std::borrow::Cow;

/// 导出字段名
pub mod export_fields {
    pub const NAME: &str = "Name";
    pub const ID: &str = "ID";
    pub const BARCODE: &str = "barcode";
    pub const EXTERNAL_NUMBER: &str = "extnr";
    pub const TARGET_STATUS: &str = "target_status";
    pub const UNIT: &str = "unit";
}

/// 以这些字符开头的值会被表格软件当作公式
pub const FORMULA_PREFIXES: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

pub const EXPORT_DELIMITER: u8 = b';';

// ==========================================
// ExportRecord - 有序字段记录
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    fields: Vec<(String, String)>,
}

impl ExportRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加字段; 同名字段覆盖原值并保留原位置
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl From<&ChangeProposal> for ExportRecord {
    fn from(proposal: &ChangeProposal) -> Self {
        ExportRecord::new()
            .with(export_fields::NAME, proposal.name.as_str())
            .with(export_fields::ID, proposal.id.as_str())
            .with(export_fields::BARCODE, proposal.barcode.as_str())
            .with(export_fields::EXTERNAL_NUMBER, proposal.external_number.as_str())
            .with(export_fields::TARGET_STATUS, proposal.target_status.as_str())
            .with(export_fields::UNIT, proposal.unit.as_str())
    }
}

pub fn to_records(proposals: &[ChangeProposal]) -> Vec<ExportRecord> {
    proposals.iter().map(ExportRecord::from).collect()
}

/// 单个值防公式注入: 危险前缀前加单引号
pub fn sanitize_value(value: &str) -> Cow<'_, str> {
    if value.starts_with(FORMULA_PREFIXES) {
        Cow::Owned(format!("'{value}"))
    } else {
        Cow::Borrowed(value)
    }
}

/// 对所有记录的所有字段做防注入处理
pub fn sanitize(records: &[ExportRecord]) -> Vec<ExportRecord> {
    records
        .iter()
        .map(|record| ExportRecord {
            fields: record
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), sanitize_value(v).into_owned()))
                .collect(),
        })
        .collect()
}

/// 序列化为分号分隔文本
///
/// # 参数
/// - records: 待导出记录
/// - fields: 字段顺序; None 时沿用第一条记录的字段顺序
///
/// # 说明
/// - 记录中缺失的字段输出为空, 未列出的字段不输出
/// - 行结束符为 CRLF
pub fn serialize(records: &[ExportRecord], fields: Option<&[&str]>) -> ExportResult<String> {
    let fields: Vec<&str> = match fields {
        Some(list) => list.to_vec(),
        None => records
            .first()
            .map(|first| first.keys().collect())
            .unwrap_or_default(),
    };
    if fields.is_empty() {
        return Err(ExportError::MissingFields);
    }

    let sanitized = sanitize(records);

    let mut writer = WriterBuilder::new()
        .delimiter(EXPORT_DELIMITER)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(&fields)?;
    for record in &sanitized {
        writer.write_record(fields.iter().map(|f| record.get(f).unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::CsvWriteError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::CsvWriteError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TargetStatus;

    fn proposal(name: &str) -> ChangeProposal {
        ChangeProposal {
            name: name.to_string(),
            id: "0007".to_string(),
            barcode: "9001".to_string(),
            external_number: "".to_string(),
            target_status: TargetStatus::Yes,
            unit: "Stück".to_string(),
        }
    }

    #[test]
    fn test_sanitize_value() {
        assert_eq!(sanitize_value("=SUM(A1:A3)"), "'=SUM(A1:A3)");
        assert_eq!(sanitize_value("+43 1 234"), "'+43 1 234");
        assert_eq!(sanitize_value("-5"), "'-5");
        assert_eq!(sanitize_value("@cmd"), "'@cmd");
        assert_eq!(sanitize_value("\tx"), "'\tx");
        assert_eq!(sanitize_value("Milch 1,5%"), "Milch 1,5%");
        assert_eq!(sanitize_value(""), "");
        // 只检查第一个字符
        assert_eq!(sanitize_value("a=b"), "a=b");
    }

    #[test]
    fn test_record_from_proposal_field_order() {
        let record = ExportRecord::from(&proposal("Milch"));
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["Name", "ID", "barcode", "extnr", "target_status", "unit"]);
        assert_eq!(record.get("target_status"), Some("yes"));
    }

    #[test]
    fn test_serialize_with_explicit_fields() {
        let records = to_records(&[proposal("Milch")]);
        let text = serialize(&records, Some(&["ID", "Name", "target_status"][..])).unwrap();
        assert_eq!(text, "ID;Name;target_status\r\n0007;Milch;yes\r\n");
    }

    #[test]
    fn test_serialize_falls_back_to_first_record_order() {
        let records = vec![
            ExportRecord::new().with("b", "1").with("a", "2"),
            ExportRecord::new().with("a", "3"),
        ];
        let text = serialize(&records, None).unwrap();
        assert_eq!(text, "b;a\r\n1;2\r\n;3\r\n");
    }

    #[test]
    fn test_serialize_sanitizes_every_field() {
        let records = to_records(&[proposal("=HYPERLINK(\"x\")")]);
        let text = serialize(&records, Some(&["Name", "ID"][..])).unwrap();
        // 含引号的字段按 CSV 规则加引号并转义
        assert_eq!(text, "Name;ID\r\n\"'=HYPERLINK(\"\"x\"\")\";0007\r\n");
    }

    #[test]
    fn test_serialize_empty_records_with_fields_writes_header() {
        let text = serialize(&[], Some(&["Name", "ID"][..])).unwrap();
        assert_eq!(text, "Name;ID\r\n");
    }

    #[test]
    fn test_serialize_without_any_fields_fails() {
        assert!(matches!(serialize(&[], None), Err(ExportError::MissingFields)));
    }

    #[test]
    fn test_with_overwrites_existing_key() {
        let record = ExportRecord::new().with("a", "1").with("b", "2").with("a", "3");
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some("3"));
    }
}

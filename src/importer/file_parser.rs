// ==========================================
// 收银核对系统 - 文件解析器实现
// ==========================================
// 格式: 分号分隔, UTF-8（可带 BOM）, 首行为表头
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawRow};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

/// 库存导出文件的分隔符
pub const CSV_DELIMITER: u8 = b';';

const UTF8_BOM: char = '\u{feff}';

/// 去除开头的 BOM
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix(UTF8_BOM).unwrap_or(content)
}

/// 字节 → UTF-8 文本（去除 BOM）
pub fn decode_utf8(bytes: Vec<u8>) -> ImportResult<String> {
    let text = String::from_utf8(bytes)?;
    Ok(match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: CSV_DELIMITER,
        }
    }
}

impl CsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl FileParser for CsvParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let bytes = std::fs::read(file_path)?;
        let content = decode_utf8(bytes)?;
        self.parse_str(&content)
    }

    fn parse_str(&self, content: &str) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(strip_bom(content).as_bytes());

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| strip_bom(h).trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;

            // 短行补空字符串, 多余单元格丢弃; 单元格原样保留
            let row_map: RawRow = headers
                .iter()
                .enumerate()
                .map(|(col_idx, header)| {
                    let value = record.get(col_idx).unwrap_or("").to_string();
                    (header.clone(), value)
                })
                .collect();

            records.push(row_map);
        }

        debug!(rows = records.len(), columns = headers.len(), "CSV 解析完成");
        Ok(records)
    }
}

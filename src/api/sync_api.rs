// ==========================================
// 收银核对系统 - 核对用例 API
// ==========================================
// 职责: 串联 解析 → 映射 → 规则引擎 → 导出
// 红线: 不打印、不做展示; 返回结构化结果（建议 + 警告 + 统计）
// 并发: 无共享可变状态, 每次调用只处理自己的数据
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ResolvedConfig;
use crate::domain::{ChangeProposal, ImportWarning};
use crate::engine::{FilterStats, SyncRuleEngine};
use crate::export::{export_fields, serialize, to_records, ExportWriter};
use crate::importer::{ArticleMapper, CsvParser, FileParser, RawRow};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// SyncReport - 一次核对运行的结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub run_id: String,                 // 运行 ID（UUID）
    pub source: String,                 // 数据来源（文件路径或上传文件名）
    pub proposals: Vec<ChangeProposal>, // 变更建议（保持输入顺序）
    pub warnings: Vec<ImportWarning>,   // 被跳过的行
    pub stats: FilterStats,             // 各过滤阶段计数
}

pub struct SyncApi {
    config: ResolvedConfig,
    file_parser: Box<dyn FileParser>,
    mapper: ArticleMapper,
}

impl SyncApi {
    pub fn new(config: ResolvedConfig) -> Self {
        Self::with_parser(config, Box::new(CsvParser::default()))
    }

    pub fn with_parser(config: ResolvedConfig, file_parser: Box<dyn FileParser>) -> Self {
        Self {
            config,
            file_parser,
            mapper: ArticleMapper::default(),
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// 处理原始行记录
    ///
    /// # 返回
    /// - Err(EmptyDataset): 映射后没有任何有效商品
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn process_rows(&self, rows: &[RawRow], source: &str) -> ApiResult<SyncReport> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, source = %source, "开始核对");

        let mapping = self.mapper.map_rows(rows);
        if mapping.articles.is_empty() {
            warn!(run_id = %run_id, skipped = mapping.warnings.len(), "没有有效的商品数据");
            return Err(ApiError::EmptyDataset);
        }

        let outcome = SyncRuleEngine::new(&self.config).execute(&mapping.articles);

        info!(
            run_id = %run_id,
            proposals = outcome.proposals.len(),
            warnings = mapping.warnings.len(),
            "核对完成"
        );

        Ok(SyncReport {
            run_id,
            source: source.to_string(),
            proposals: outcome.proposals,
            warnings: mapping.warnings,
            stats: outcome.stats,
        })
    }

    /// 处理内存中的 CSV 文本（HTTP 上传）
    pub fn process_csv_text(&self, content: &str, source: &str) -> ApiResult<SyncReport> {
        let rows = self.file_parser.parse_str(content)?;
        self.process_rows(&rows, source)
    }

    /// 处理磁盘上的 CSV 文件
    pub fn process_csv_file(&self, path: &Path) -> ApiResult<SyncReport> {
        let rows = self.file_parser.parse_file(path)?;
        self.process_rows(&rows, &path.display().to_string())
    }

    /// 导出字段顺序
    pub fn export_fields(&self) -> Vec<&'static str> {
        let mut fields = vec![
            export_fields::NAME,
            export_fields::ID,
            export_fields::BARCODE,
            export_fields::EXTERNAL_NUMBER,
            export_fields::TARGET_STATUS,
        ];
        if self.config.include_unit_column {
            fields.push(export_fields::UNIT);
        }
        fields
    }

    /// 生成导出文本（HTTP 下载）
    pub fn render_csv(&self, report: &SyncReport) -> ApiResult<String> {
        let fields = self.export_fields();
        Ok(serialize(&to_records(&report.proposals), Some(fields.as_slice()))?)
    }

    /// 写入带时间戳的导出文件
    ///
    /// # 返回
    /// - Ok(None): 没有建议, 未写文件
    pub fn export_to_dir(
        &self,
        report: &SyncReport,
        now: NaiveDateTime,
    ) -> ApiResult<Option<PathBuf>> {
        let writer = ExportWriter::new(
            self.config.output_dir.clone(),
            self.config.output_base_name.clone(),
        );
        let fields = self.export_fields();
        Ok(writer.write(&to_records(&report.proposals), &fields, now)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TargetStatus;

    const HEADER: &str = "ID;name;lagerstand;kassaartikel;einheit;barcode;extnr\n";

    #[test]
    fn test_process_csv_text() {
        let api = SyncApi::new(ResolvedConfig::default());
        let content = format!("{HEADER}1;Milch;5,0;0;Stück;900;E1\n2;Brot;3;1;Stück;;\n");

        let report = api.process_csv_text(&content, "upload.csv").unwrap();
        assert_eq!(report.source, "upload.csv");
        assert_eq!(report.proposals.len(), 1);
        assert_eq!(report.proposals[0].id, "1");
        assert_eq!(report.proposals[0].target_status, TargetStatus::Yes);
        assert_eq!(report.stats.no_action, 1);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let api = SyncApi::new(ResolvedConfig::default());
        let err = api
            .process_csv_text(&format!("{HEADER}1;Milch;abc;0;;;\n"), "x.csv")
            .unwrap_err();
        assert!(matches!(err, ApiError::EmptyDataset));

        let err = api.process_csv_text(HEADER, "x.csv").unwrap_err();
        assert!(matches!(err, ApiError::EmptyDataset));
    }

    #[test]
    fn test_export_fields_respect_unit_column_option() {
        let mut config = ResolvedConfig::default();
        assert_eq!(
            SyncApi::new(config.clone()).export_fields(),
            vec!["Name", "ID", "barcode", "extnr", "target_status", "unit"]
        );

        config.include_unit_column = false;
        assert_eq!(
            SyncApi::new(config).export_fields(),
            vec!["Name", "ID", "barcode", "extnr", "target_status"]
        );
    }

    #[test]
    fn test_render_csv() {
        let api = SyncApi::new(ResolvedConfig::default());
        let content = format!("{HEADER}0815;-Rabatt;0;1;kg;;=1+1\n");

        let report = api.process_csv_text(&content, "x.csv").unwrap();
        let csv = api.render_csv(&report).unwrap();
        assert_eq!(
            csv,
            "Name;ID;barcode;extnr;target_status;unit\r\n'-Rabatt;0815;;'=1+1;no;kg\r\n"
        );
    }
}

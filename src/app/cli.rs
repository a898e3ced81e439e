// ==========================================
// 收银核对系统 - 命令行控制器
// ==========================================
// 职责: 选取 data 目录中最新的 CSV → 核对 → 写入 output 目录
// 输出: 控制台摘要（建议数量、被跳过的行、输出文件）
// ==========================================

use crate::api::{ApiError, ApiResult, SyncApi, SyncReport};
use crate::config::ResolvedConfig;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::info;

/// 一次命令行运行的结果
#[derive(Debug, Clone)]
pub struct CliOutcome {
    pub input: PathBuf,
    pub report: SyncReport,
    pub output: Option<PathBuf>, // None: 没有建议, 未写文件
}

pub struct CliController {
    api: SyncApi,
}

impl CliController {
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            api: SyncApi::new(config),
        }
    }

    /// 执行一次核对
    ///
    /// # 参数
    /// - now: 输出文件名的时间戳
    pub fn run(&self, now: NaiveDateTime) -> ApiResult<CliOutcome> {
        let input = find_latest_csv(&self.api.config().data_dir)?;
        info!(input = %input.display(), "选取输入文件");

        let report = self.api.process_csv_file(&input)?;
        let output = self.api.export_to_dir(&report, now)?;

        Ok(CliOutcome {
            input,
            report,
            output,
        })
    }

    /// 执行并在控制台打印摘要
    pub fn execute(&self, now: NaiveDateTime) -> ApiResult<CliOutcome> {
        println!("=== 收银标记核对 (命令行模式) ===");
        let result = self.run(now);

        match &result {
            Ok(outcome) => print_summary(outcome),
            Err(e) => println!("错误: {}", e),
        }

        println!("==================================================");
        result
    }
}

fn print_summary(outcome: &CliOutcome) {
    println!("处理文件: {}", outcome.input.display());
    println!(
        "{} 个商品需要调整收银标记",
        outcome.report.proposals.len()
    );

    for warning in &outcome.report.warnings {
        println!(
            "  跳过第 {} 行 (ID: {}): {}",
            warning.row_number, warning.article_id, warning.message
        );
    }

    match &outcome.output {
        Some(path) => println!("已写入: {}", path.display()),
        None => println!("没有需要调整的商品, 未生成文件"),
    }
}

/// 查找目录中文件名排序最后的 *.csv
///
/// 文件名通常以日期开头, 排序最后即最新
pub fn find_latest_csv(data_dir: &Path) -> ApiResult<PathBuf> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        ApiError::NotFound(format!("无法读取数据目录 {}: {}", data_dir.display(), e))
    })?;

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_csv_extension(path))
        .max_by(|a, b| a.file_name().cmp(&b.file_name()))
        .ok_or_else(|| {
            ApiError::NotFound(format!("数据目录 {} 中没有 CSV 文件", data_dir.display()))
        })
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

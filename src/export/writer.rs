// ==========================================
// 收银核对系统 - 导出文件写入
// ==========================================
// 职责: 带时间戳的文件名 / 写入输出目录 / 下载文件名
// 红线: 先完整序列化, 写入临时文件后重命名, 失败时不留下半个文件
// ==========================================

use crate::export::error::{ExportError, ExportResult};
use crate::export::formatter::{serialize, ExportRecord};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::info;

/// 时间戳前缀格式（YYMMDD HHMM）
pub const TIMESTAMP_FORMAT: &str = "%y%m%d %H%M";

const MAX_FILENAME_LENGTH: usize = 255;

pub struct ExportWriter {
    output_dir: PathBuf,
    base_name: String,
}

impl ExportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
        }
    }

    /// 生成文件名: "<YYMMDD HHMM>_<base_name>"
    pub fn file_name_for(&self, now: NaiveDateTime) -> String {
        format!("{}_{}", now.format(TIMESTAMP_FORMAT), self.base_name)
    }

    /// 写入导出文件
    ///
    /// # 返回
    /// - Ok(Some(path)): 写入的文件路径
    /// - Ok(None): 没有记录, 未写文件
    pub fn write(
        &self,
        records: &[ExportRecord],
        fields: &[&str],
        now: NaiveDateTime,
    ) -> ExportResult<Option<PathBuf>> {
        if records.is_empty() {
            info!("没有需要导出的记录, 跳过写文件");
            return Ok(None);
        }

        let content = serialize(records, Some(fields))?;
        let path = self.output_dir.join(self.file_name_for(now));

        std::fs::create_dir_all(&self.output_dir).map_err(|e| ExportError::FileWriteError {
            path: self.output_dir.display().to_string(),
            message: e.to_string(),
        })?;
        write_text(&path, &content)?;

        info!(path = %path.display(), rows = records.len(), "导出文件写入完成");
        Ok(Some(path))
    }
}

/// 先写同目录临时文件, 再重命名到目标路径
fn write_text(path: &Path, content: &str) -> ExportResult<()> {
    let tmp_path = temp_path_for(path);
    let to_error = |e: std::io::Error| ExportError::FileWriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Err(e) = std::fs::write(&tmp_path, content) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(to_error(e));
    }
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        to_error(e)
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", file_name))
}

/// 下载文件名: "<上传文件名主干><postfix>.csv"
///
/// 结果只含 ASCII 字母数字及 "-_." , 可直接放入 Content-Disposition
pub fn download_file_name(upload_name: &str, postfix: &str) -> String {
    // 去掉目录部分
    let file_name = upload_name.rsplit(['/', '\\']).next().unwrap_or(upload_name);
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let mut stem = sanitize_file_component(stem);
    let postfix = sanitize_file_component(postfix);
    if stem.is_empty() {
        stem = "upload".to_string();
    }

    let max_stem = MAX_FILENAME_LENGTH.saturating_sub(postfix.len() + ".csv".len());
    stem.truncate(max_stem);

    format!("{stem}{postfix}.csv")
}

fn sanitize_file_component(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_file_name_for() {
        let writer = ExportWriter::new("output", "artikel_vorschlaege.csv");
        assert_eq!(writer.file_name_for(at(9, 5)), "240307 0905_artikel_vorschlaege.csv");
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("output");
        let writer = ExportWriter::new(&out, "x.csv");

        let records = vec![ExportRecord::new().with("ID", "1")];
        let path = writer.write(&records, &["ID"], at(14, 30)).unwrap().unwrap();

        assert_eq!(path, out.join("240307 1430_x.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "ID\r\n1\r\n");
    }

    #[test]
    fn test_write_leaves_only_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path(), "x.csv");
        let records = vec![ExportRecord::new().with("ID", "1")];

        writer.write(&records, &["ID"], at(10, 0)).unwrap();
        // 同一分钟再次导出覆盖旧文件
        writer.write(&records, &["ID"], at(10, 0)).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["240307 1000_x.csv".to_string()]);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path(), "x.csv");
        // 目标路径被目录占用, 重命名失败
        std::fs::create_dir(dir.path().join("240307 1100_x.csv")).unwrap();

        let records = vec![ExportRecord::new().with("ID", "1")];
        let err = writer.write(&records, &["ID"], at(11, 0)).unwrap_err();
        assert!(matches!(err, ExportError::FileWriteError { .. }));
        assert!(!dir.path().join(".240307 1100_x.csv.tmp").exists());
    }

    #[test]
    fn test_write_skips_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        let writer = ExportWriter::new(&out, "x.csv");

        assert_eq!(writer.write(&[], &["ID"], at(1, 0)).unwrap(), None);
        assert!(!out.exists());
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(
            download_file_name("lager_2024.csv", "vorschlaege_IN_KASSA"),
            "lager_2024vorschlaege_IN_KASSA.csv"
        );
        assert_eq!(download_file_name("../../etc/passwd.csv", "_x"), "passwd_x.csv");
        assert_eq!(download_file_name("Bestand März.csv", ""), "BestandMrz.csv");
        assert_eq!(download_file_name("", "_x"), "upload_x.csv");
    }
}

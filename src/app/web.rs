// ==========================================
// 收银核对系统 - Web 控制器
// ==========================================
// 职责: HTTP 上传 → 核对 → JSON 结果 / CSV 下载
// 路由:
//   GET  /api/config   当前生效配置
//   POST /api/process  上传 CSV, 返回 JSON
//   POST /upload       上传 CSV, 返回 CSV 附件
// 红线: 每次请求重新读取配置; 请求之间不共享可变状态
// ==========================================

use crate::api::{ApiError, ApiResult, SyncApi, SyncReport};
use crate::config::{defaults, load_config, ResolvedConfig};
use crate::domain::{ChangeProposal, ImportWarning};
use crate::engine::FilterStats;
use crate::export::download_file_name;
use crate::importer::decode_utf8;
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// 上传表单中的文件字段名
pub const UPLOAD_FIELD: &str = "file";

// ==========================================
// 共享状态
// ==========================================

#[derive(Clone)]
pub struct WebState {
    config_path: Arc<PathBuf>,
    upload_limit: usize, // 由 build_router 设置
}

impl WebState {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Arc::new(config_path.into()),
            upload_limit: defaults::MAX_UPLOAD_BYTES,
        }
    }

    /// 重新读取配置文件
    pub fn current_config(&self) -> ResolvedConfig {
        load_config(&self.config_path).config
    }
}

// ==========================================
// 错误响应
// ==========================================

/// ApiError 的 HTTP 包装, 响应体为 {"detail": "..."}
#[derive(Debug)]
pub struct WebError(pub ApiError);

impl From<ApiError> for WebError {
    fn from(err: ApiError) -> Self {
        WebError(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(status = status.as_u16(), "请求处理失败: {}", self.0);
        } else {
            warn!(status = status.as_u16(), "请求被拒绝: {}", self.0);
        }

        let body = serde_json::json!({ "detail": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

type WebResult<T> = Result<T, WebError>;

// ==========================================
// 上传处理
// ==========================================

/// 上传的文件
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// /api/process 响应体
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub filename: String,
    pub results: Vec<ChangeProposal>,
    pub warnings: Vec<ImportWarning>,
    pub stats: FilterStats,
}

/// 只接受 .csv 文件
pub fn validate_upload_name(file_name: &str) -> ApiResult<()> {
    let is_csv = file_name.len() > ".csv".len()
        && file_name
            .get(file_name.len() - ".csv".len()..)
            .map(|ext| ext.eq_ignore_ascii_case(".csv"))
            .unwrap_or(false);

    if is_csv {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!(
            "只允许上传 CSV 文件: '{}'",
            file_name
        )))
    }
}

/// 校验文件名 → 解码 → 核对
pub fn process_upload(api: &SyncApi, upload: &Upload) -> ApiResult<SyncReport> {
    validate_upload_name(&upload.file_name)?;
    let content = decode_utf8(upload.bytes.clone())?;
    api.process_csv_text(&content, &upload.file_name)
}

/// 读取请求体失败: 超过上限 → 413, 其他 → 400
fn multipart_error(err: MultipartError, limit: usize, what: &str) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::InvalidInput(format!("无法读取{}: {}", what, err))
    }
}

async fn read_upload(mut multipart: Multipart, limit: usize) -> ApiResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit, "上传内容"))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit, "上传文件"))?;

        info!(file_name = %file_name, size = bytes.len(), "收到上传文件");
        return Ok(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::InvalidInput(format!(
        "缺少上传字段 '{}'",
        UPLOAD_FIELD
    )))
}

/// 在阻塞线程池中执行（读取配置文件 + 核对）
async fn run_blocking<T, F>(task: F) -> WebResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ApiResult<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ApiError::InternalError(format!("后台任务失败: {}", e)))?;
    Ok(result?)
}

// ==========================================
// 路由处理函数
// ==========================================

pub async fn get_config(State(state): State<WebState>) -> WebResult<Json<ResolvedConfig>> {
    let config = run_blocking(move || Ok(state.current_config())).await?;
    Ok(Json(config))
}

pub async fn process_csv(
    State(state): State<WebState>,
    multipart: Multipart,
) -> WebResult<Json<ProcessResponse>> {
    let upload = read_upload(multipart, state.upload_limit).await?;

    let report = run_blocking(move || {
        let api = SyncApi::new(state.current_config());
        process_upload(&api, &upload)
    })
    .await?;

    Ok(Json(ProcessResponse {
        filename: report.source,
        results: report.proposals,
        warnings: report.warnings,
        stats: report.stats,
    }))
}

pub async fn download_csv(
    State(state): State<WebState>,
    multipart: Multipart,
) -> WebResult<Response> {
    let upload = read_upload(multipart, state.upload_limit).await?;

    let (file_name, content) = run_blocking(move || {
        let api = SyncApi::new(state.current_config());
        let report = process_upload(&api, &upload)?;
        let content = api.render_csv(&report)?;
        let file_name = download_file_name(&upload.file_name, &api.config().web_download_postfix);
        Ok((file_name, content))
    })
    .await?;

    info!(file_name = %file_name, "返回下载文件");
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];
    Ok((headers, content).into_response())
}

// ==========================================
// 路由与服务
// ==========================================

pub fn build_router(state: WebState, max_upload_bytes: usize) -> Router {
    let state = WebState {
        upload_limit: max_upload_bytes,
        ..state
    };

    Router::new()
        .route("/api/config", get(get_config))
        .route("/api/process", post(process_csv))
        .route("/upload", post(download_csv))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// 启动 Web 服务（阻塞直到服务停止）
///
/// 监听地址与上传上限取启动时的配置; 其余配置每次请求重新读取
pub async fn run_server(config_path: PathBuf, config: &ResolvedConfig) -> std::io::Result<()> {
    let app = build_router(WebState::new(config_path), config.max_upload_bytes);

    let addr = config.web_bind_address.as_str();
    info!("尝试绑定 http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("服务已绑定 {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                error!("端口已被占用: {}", addr);
            } else {
                error!("无法绑定 {}: {}", addr, e);
            }
            return Err(e);
        }
    };

    axum::serve(listener, app).await
}

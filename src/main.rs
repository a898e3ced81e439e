// ==========================================
// 收银核对系统 - 主入口
// ==========================================
// 流程: 日志 → 配置 → 按 mode 选择控制器
//   local: 处理 data 目录中最新的文件
//   web:   启动 HTTP 服务
// ==========================================

use anyhow::{bail, Context};
use pos_stock_sync::app::{run_server, CliController};
use pos_stock_sync::config::{default_config_path, load_config};
use pos_stock_sync::domain::AppMode;
use pos_stock_sync::logging;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", pos_stock_sync::APP_NAME);
    tracing::info!("系统版本: {}", pos_stock_sync::VERSION);
    tracing::info!("==================================================");

    let config_path = default_config_path();
    // 读取失败已在加载时记录警告
    let load = load_config(&config_path);
    let config = load.config;
    tracing::info!(source = %load.source.display(), mode = %config.mode, "配置已加载");

    let mode: AppMode = match config.mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            let allowed: Vec<&str> = AppMode::ALL.iter().map(|m| m.as_str()).collect();
            tracing::error!("{}, 允许的值: {}", e, allowed.join(", "));
            bail!(e);
        }
    };

    match mode {
        AppMode::Local => {
            let controller = CliController::new(config);
            let now = chrono::Local::now().naive_local();
            // 错误已打印到控制台, 不区分退出码
            if let Err(e) = controller.execute(now) {
                tracing::error!("核对未完成: {}", e);
            }
        }
        AppMode::Web => {
            let runtime = tokio::runtime::Runtime::new().context("无法创建异步运行时")?;
            runtime
                .block_on(run_server(config_path, &config))
                .context("Web 服务异常退出")?;
        }
    }

    Ok(())
}

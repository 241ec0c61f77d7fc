// ==========================================
// Accurate 导入服务 - HTTP 服务启动
// ==========================================
// 流程: 装配状态 -> 启动导入 worker -> 监听 -> 优雅退出
// 退出时: 停止接收请求, worker 处理完已入队任务后结束
// ==========================================

use tokio::signal;
use tracing::{error, info};

use crate::app::routes::build_router;
use crate::app::state::AppState;
use crate::config::AppConfig;

/// 启动服务, 阻塞直到收到退出信号
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;

    info!(
        api_host = %config.accurate.api_host,
        database_path = %config.database_path,
        max_upload_mb = config.max_upload_mb,
        "服务配置"
    );

    let (state, worker) = AppState::new(config).map_err(anyhow::Error::msg)?;
    let worker_handle = worker.spawn();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Accurate 导入服务已启动");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 路由释放后队列发送端全部关闭, worker 排空退出
    info!("等待导入 worker 处理剩余任务");
    if let Err(e) = worker_handle.await {
        error!(error = %e, "导入 worker 异常退出");
    }

    info!("服务已停止");
    Ok(())
}

/// 退出信号: Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "无法监听 Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "无法监听 SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("收到 Ctrl+C, 正在退出"),
        _ = terminate => info!("收到 SIGTERM, 正在退出"),
    }
}

// ==========================================
// Accurate 导入服务 - 主入口
// ==========================================

use accurate_import::{logging, start_server, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    logging::init(config.log_json);

    tracing::info!("==================================================");
    tracing::info!("{}", accurate_import::APP_NAME);
    tracing::info!("系统版本: {}", accurate_import::VERSION);
    tracing::info!("==================================================");

    start_server(config).await
}

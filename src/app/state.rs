// ==========================================
// Accurate 导入服务 - 应用状态
// ==========================================
// 职责: 装配存储、导入器、远端网关、任务队列与各 API 实例
// 说明: ImportWorker 由调用方负责 spawn
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::accurate::{AccurateClient, AccurateGateway};
use crate::api::{DashboardApi, EntityApi, ImportApi};
use crate::config::AppConfig;
use crate::db::open_store;
use crate::importer::SheetImporter;
use crate::pipeline::{ImportJobProcessor, ImportQueue, ImportWorker, LocalStores};
use crate::repository::{
    ApiLogRepository, ImportJobRepository, SalesInvoiceRepository, WarehouseRepository,
};

/// 应用状态
///
/// 所有字段均为 Arc, 在 axum 处理器之间共享
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,

    /// 仪表盘API
    pub dashboard_api: Arc<DashboardApi>,

    /// 仓库/发票API
    pub entity_api: Arc<EntityApi>,

    /// 导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 使用真实 Accurate 客户端创建应用状态
    pub fn new(config: AppConfig) -> Result<(Self, ImportWorker), String> {
        let client = AccurateClient::new(&config.accurate)
            .map_err(|e| format!("无法创建 Accurate 客户端: {}", e))?;
        Self::with_gateway(config, Arc::new(client))
    }

    /// 使用指定网关创建应用状态
    pub fn with_gateway(
        config: AppConfig,
        gateway: Arc<dyn AccurateGateway>,
    ) -> Result<(Self, ImportWorker), String> {
        info!(database_path = %config.database_path, "初始化存储");
        let conn = open_store(&config.database_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;

        // ==========================================
        // 仓储
        // ==========================================
        let warehouses = Arc::new(WarehouseRepository::new(conn.clone()));
        let sales_invoices = Arc::new(SalesInvoiceRepository::new(conn.clone()));
        let jobs = Arc::new(ImportJobRepository::new(conn.clone()));
        let api_logs = Arc::new(ApiLogRepository::new(conn));

        // ==========================================
        // 导入流水线
        // ==========================================
        let importer = Arc::new(SheetImporter::default());
        let processor = Arc::new(ImportJobProcessor::new(
            importer.clone(),
            gateway.clone(),
            jobs.clone(),
            LocalStores {
                warehouses: warehouses.clone(),
                sales_invoices: sales_invoices.clone(),
            },
            config.max_job_errors,
        ));
        let (queue, worker) = ImportQueue::channel(config.queue_capacity, processor, jobs.clone());

        // ==========================================
        // API 实例
        // ==========================================
        let dashboard_api = Arc::new(DashboardApi::new(
            gateway.clone(),
            jobs.clone(),
            warehouses.clone(),
            sales_invoices.clone(),
            api_logs.clone(),
        ));
        let entity_api = Arc::new(EntityApi::new(
            gateway,
            warehouses,
            sales_invoices,
            api_logs,
        ));
        let import_api = Arc::new(ImportApi::new(importer, queue, jobs));

        info!("AppState 初始化完成");
        Ok((
            Self {
                config: Arc::new(config),
                dashboard_api,
                entity_api,
                import_api,
            },
            worker,
        ))
    }
}

// ==========================================
// Accurate 导入服务 - 仪表盘 API
// ==========================================
// 职责: 连通性检测 / 导入统计 / API 调用日志查询
// 说明: 连通性检测本身也会追加一条 ApiLog
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::accurate::envelope::ConnectionStatus;
use crate::accurate::gateway::AccurateGateway;
use crate::api::error::ApiResult;
use crate::domain::api_log::{ApiLog, NewApiLog};
use crate::domain::types::ImportStatus;
use crate::repository::{
    ApiLogRepository, ImportJobRepository, SalesInvoiceRepository, WarehouseRepository,
};

/// 日志查询默认条数
pub const DEFAULT_LOG_LIMIT: usize = 50;

pub const STATUS_ENDPOINT: &str = "/api/status";

// ==========================================
// DashboardStats - 仪表盘统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_imports: i64,
    pub successful: i64,
    pub failed: i64,
    pub warehouses: i64,
    pub sales_invoices: i64,
}

// ==========================================
// DashboardApi
// ==========================================
pub struct DashboardApi {
    gateway: Arc<dyn AccurateGateway>,
    jobs: Arc<ImportJobRepository>,
    warehouses: Arc<WarehouseRepository>,
    sales_invoices: Arc<SalesInvoiceRepository>,
    api_logs: Arc<ApiLogRepository>,
}

impl DashboardApi {
    pub fn new(
        gateway: Arc<dyn AccurateGateway>,
        jobs: Arc<ImportJobRepository>,
        warehouses: Arc<WarehouseRepository>,
        sales_invoices: Arc<SalesInvoiceRepository>,
        api_logs: Arc<ApiLogRepository>,
    ) -> Self {
        Self {
            gateway,
            jobs,
            warehouses,
            sales_invoices,
            api_logs,
        }
    }

    /// 检测远端连通性
    ///
    /// 无论是否连通, 接口本身返回 200, 日志中记录 200 与实测耗时
    pub async fn connection_status(&self) -> ApiResult<ConnectionStatus> {
        let status = self.gateway.test_connection().await;

        if status.connected {
            info!(response_time = status.response_time, "Accurate 连通");
        } else {
            warn!(
                response_time = status.response_time,
                error = status.error.as_deref().unwrap_or_default(),
                "Accurate 未连通"
            );
        }

        self.api_logs.append(&NewApiLog::new(
            STATUS_ENDPOINT,
            "GET",
            200,
            status.response_time as i64,
        ))?;

        Ok(status)
    }

    /// 导入统计
    ///
    /// successful / failed 仅统计终态任务
    pub fn stats(&self) -> ApiResult<DashboardStats> {
        Ok(DashboardStats {
            total_imports: self.jobs.count()?,
            successful: self.jobs.count_by_status(ImportStatus::Completed)?,
            failed: self.jobs.count_by_status(ImportStatus::Failed)?,
            warehouses: self.warehouses.count()?,
            sales_invoices: self.sales_invoices.count()?,
        })
    }

    /// 最新 API 日志
    ///
    /// limit 缺失或非正数时回退为默认值
    pub fn list_logs(&self, limit: Option<i64>) -> ApiResult<Vec<ApiLog>> {
        let limit = match limit {
            Some(n) if n > 0 => n as usize,
            _ => DEFAULT_LOG_LIMIT,
        };
        Ok(self.api_logs.list(limit)?)
    }
}

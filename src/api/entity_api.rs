// ==========================================
// Accurate 导入服务 - 实体 API
// ==========================================
// 职责: 本地仓库/发票查询, 以及从远端拉取并补齐本地记录
// 同步规则:
// - 以 accurate_id 判重, 仅插入本地不存在的记录
// - 返回本次新插入的记录 (synced == 列表长度)
// - 远端失败信封 -> RemoteSyncFailed (HTTP 400)
// - 每次同步追加一条 ApiLog (返回给调用方的状态码 + 耗时)
// 说明: 判重与插入不在同一事务内, 并发同步可能产生重复行
// ==========================================

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::accurate::gateway::AccurateGateway;
use crate::accurate::models::{RemoteSalesInvoice, RemoteWarehouse};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::api_log::NewApiLog;
use crate::domain::import_row::DEFAULT_INVOICE_STATUS;
use crate::domain::sales_invoice::{to_minor_units, NewSalesInvoice, SalesInvoice};
use crate::domain::warehouse::{NewWarehouse, Warehouse};
use crate::importer::row_validator::parse_date;
use crate::repository::{ApiLogRepository, SalesInvoiceRepository, WarehouseRepository};

pub const WAREHOUSE_SYNC_ENDPOINT: &str = "/api/warehouses/sync";
pub const SALES_INVOICE_SYNC_ENDPOINT: &str = "/api/sales-invoices/sync";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseSyncResult {
    pub synced: usize,
    pub warehouses: Vec<Warehouse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesInvoiceSyncResult {
    pub synced: usize,
    pub invoices: Vec<SalesInvoice>,
}

// ==========================================
// EntityApi
// ==========================================
pub struct EntityApi {
    gateway: Arc<dyn AccurateGateway>,
    warehouses: Arc<WarehouseRepository>,
    sales_invoices: Arc<SalesInvoiceRepository>,
    api_logs: Arc<ApiLogRepository>,
}

impl EntityApi {
    pub fn new(
        gateway: Arc<dyn AccurateGateway>,
        warehouses: Arc<WarehouseRepository>,
        sales_invoices: Arc<SalesInvoiceRepository>,
        api_logs: Arc<ApiLogRepository>,
    ) -> Self {
        Self {
            gateway,
            warehouses,
            sales_invoices,
            api_logs,
        }
    }

    pub fn list_warehouses(&self) -> ApiResult<Vec<Warehouse>> {
        Ok(self.warehouses.list()?)
    }

    pub fn list_sales_invoices(&self) -> ApiResult<Vec<SalesInvoice>> {
        Ok(self.sales_invoices.list()?)
    }

    // ==========================================
    // 仓库同步
    // ==========================================

    pub async fn sync_warehouses(&self) -> ApiResult<WarehouseSyncResult> {
        let started = Instant::now();
        let result = self.pull_warehouses().await;
        self.record_call(WAREHOUSE_SYNC_ENDPOINT, &result, started);

        if let Ok(outcome) = &result {
            info!(synced = outcome.synced, "仓库同步完成");
        }
        result
    }

    async fn pull_warehouses(&self) -> ApiResult<WarehouseSyncResult> {
        let remote = self
            .gateway
            .list_warehouses(None)
            .await
            .into_result()
            .map_err(|e| {
                ApiError::RemoteSyncFailed(format!(
                    "Failed to sync warehouses from Accurate API: {}",
                    e
                ))
            })?;

        let mut inserted = Vec::new();
        for item in remote {
            if self.warehouses.find_by_accurate_id(&item.id)?.is_some() {
                continue;
            }
            inserted.push(self.warehouses.create(&warehouse_from_remote(item))?);
        }

        Ok(WarehouseSyncResult {
            synced: inserted.len(),
            warehouses: inserted,
        })
    }

    // ==========================================
    // 发票同步
    // ==========================================

    pub async fn sync_sales_invoices(&self) -> ApiResult<SalesInvoiceSyncResult> {
        let started = Instant::now();
        let result = self.pull_sales_invoices().await;
        self.record_call(SALES_INVOICE_SYNC_ENDPOINT, &result, started);

        if let Ok(outcome) = &result {
            info!(synced = outcome.synced, "发票同步完成");
        }
        result
    }

    async fn pull_sales_invoices(&self) -> ApiResult<SalesInvoiceSyncResult> {
        let remote = self
            .gateway
            .list_sales_invoices(None)
            .await
            .into_result()
            .map_err(|e| {
                ApiError::RemoteSyncFailed(format!(
                    "Failed to sync sales invoices from Accurate API: {}",
                    e
                ))
            })?;

        let mut inserted = Vec::new();
        for item in remote {
            if self.sales_invoices.find_by_accurate_id(&item.id)?.is_some() {
                continue;
            }
            inserted.push(self.sales_invoices.create(&sales_invoice_from_remote(item))?);
        }

        Ok(SalesInvoiceSyncResult {
            synced: inserted.len(),
            invoices: inserted,
        })
    }

    /// 追加同步调用日志; 写日志失败不影响同步结果
    fn record_call<T>(&self, endpoint: &str, result: &ApiResult<T>, started: Instant) {
        let status_code = match result {
            Ok(_) => 200,
            Err(ApiError::RemoteSyncFailed(message)) => {
                warn!(endpoint, error = %message, "远端同步失败");
                400
            }
            Err(e) => {
                warn!(endpoint, error = %e, "同步过程出错");
                500
            }
        };
        let elapsed = started.elapsed().as_millis() as i64;

        if let Err(e) = self
            .api_logs
            .append(&NewApiLog::new(endpoint, "POST", status_code, elapsed))
        {
            warn!(endpoint, error = %e, "API 日志写入失败");
        }
    }
}

fn warehouse_from_remote(item: RemoteWarehouse) -> NewWarehouse {
    NewWarehouse {
        accurate_id: Some(item.id),
        name: item.name,
        description: item.description,
    }
}

fn sales_invoice_from_remote(item: RemoteSalesInvoice) -> NewSalesInvoice {
    // 远端日期多为 DD/MM/YYYY, 本地统一为 YYYY-MM-DD
    let date = match item.date {
        Some(raw) => parse_date(&raw)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or(raw),
        None => String::new(),
    };

    NewSalesInvoice {
        accurate_id: Some(item.id),
        invoice_number: item.number,
        customer_name: item.customer_name,
        amount: to_minor_units(item.amount.unwrap_or(0.0)),
        status: item
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_INVOICE_STATUS.to_string()),
        date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_invoice_from_remote_normalizes_fields() {
        let new = sales_invoice_from_remote(RemoteSalesInvoice {
            id: "77".to_string(),
            number: "INV-77".to_string(),
            customer_name: "PT Maju".to_string(),
            amount: Some(1234.5),
            status: None,
            date: Some("15/01/2024".to_string()),
        });

        assert_eq!(new.accurate_id.as_deref(), Some("77"));
        assert_eq!(new.amount, 123450);
        assert_eq!(new.status, DEFAULT_INVOICE_STATUS);
        assert_eq!(new.date, "2024-01-15");
    }

    #[test]
    fn test_sales_invoice_from_remote_missing_values() {
        let new = sales_invoice_from_remote(RemoteSalesInvoice {
            id: "78".to_string(),
            number: "INV-78".to_string(),
            customer_name: String::new(),
            amount: None,
            status: Some("paid".to_string()),
            date: None,
        });

        assert_eq!(new.amount, 0);
        assert_eq!(new.status, "paid");
        assert_eq!(new.date, "");
    }
}

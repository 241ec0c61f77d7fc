// ==========================================
// Accurate 导入服务 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入行模型
// 红线: 不含数据访问逻辑, 不含远端调用
// ==========================================

pub mod api_log;
pub mod import_job;
pub mod import_row;
pub mod sales_invoice;
pub mod types;
pub mod warehouse;

// 重导出核心类型
pub use api_log::{ApiLog, NewApiLog};
pub use import_job::{ImportJob, JobProgress};
pub use import_row::{
    ImportRows, ParsedSheet, SalesInvoiceRow, ValidationResult, WarehouseRow,
};
pub use sales_invoice::{to_minor_units, NewSalesInvoice, SalesInvoice};
pub use types::{ImportStatus, ImportType};
pub use warehouse::{NewWarehouse, Warehouse};

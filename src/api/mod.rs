// ==========================================
// Accurate 导入服务 - API 层
// ==========================================
// 职责: 面向 HTTP 处理器的业务接口
// ==========================================

pub mod dashboard_api;
pub mod entity_api;
pub mod error;
pub mod import_api;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardStats, DEFAULT_LOG_LIMIT};
pub use entity_api::{EntityApi, SalesInvoiceSyncResult, WarehouseSyncResult};
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, UploadedFile, ValidateResponse, PREVIEW_ROWS};

// ==========================================
// Accurate 导入服务 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口, 屏蔽数据库细节
// 约束: 所有查询使用参数化, 防止 SQL 注入
// ==========================================

pub mod api_log_repo;
pub mod error;
pub mod import_job_repo;
pub mod sales_invoice_repo;
pub mod warehouse_repo;

// 重导出核心仓储
pub use api_log_repo::ApiLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use import_job_repo::{ImportJobRepository, CANCELLED_MESSAGE};
pub use sales_invoice_repo::SalesInvoiceRepository;
pub use warehouse_repo::WarehouseRepository;

// ==========================================
// Accurate 导入服务 - 核心库
// ==========================================
// 职责: Excel/CSV 业务数据导入, 校验后同步至 Accurate 会计 API
// 技术栈: axum + Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 模板/解析/校验
pub mod importer;

// 远端层 - Accurate API 客户端
pub mod accurate;

// 流水线层 - 导入任务队列
pub mod pipeline;

// 配置层
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    ApiLog, ImportJob, ImportRows, ImportStatus, ImportType, SalesInvoice, Warehouse,
};

pub use accurate::{AccurateClient, AccurateGateway, ConnectionStatus, Envelope};

pub use api::{ApiError, ApiResult, DashboardApi, EntityApi, ImportApi};

pub use app::{build_router, start_server, AppState};

pub use config::AppConfig;

// ==========================================
// 版本信息
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Accurate 导入服务";

// ==========================================
// Accurate 导入服务 - 配置层
// ==========================================
// 职责: 服务配置加载, 支持文件与环境变量多级覆写
// ==========================================

pub mod app_config;

pub use app_config::{AccurateSettings, AppConfig};

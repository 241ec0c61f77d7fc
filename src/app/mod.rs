// ==========================================
// Accurate 导入服务 - 应用层
// ==========================================
// 职责: axum HTTP 集成, 连接前端与 API 层
// ==========================================

pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

// 重导出
pub use response::{ErrorDetail, ErrorResponse};
pub use routes::build_router;
pub use server::start_server;
pub use state::AppState;

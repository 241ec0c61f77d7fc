// ==========================================
// Accurate 导入服务 - HTTP 处理器
// ==========================================
// 职责: 解析请求 -> 调用 API 层 -> 序列化响应
// 业务规则全部位于 API 层
// ==========================================

pub mod dashboard;
pub mod entity;
pub mod import;
pub mod upload;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::api::ApiError;

/// 存活检查
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": crate::APP_NAME,
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// 未定义路由
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

// ==========================================
// Accurate 导入服务 - 路由
// ==========================================

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::app::handlers::{self, dashboard, entity, import};
use crate::app::state::AppState;

/// 构建路由
///
/// 上传大小上限对所有请求体生效
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    let api_routes = Router::new()
        // 仪表盘
        .route("/api/status", get(dashboard::connection_status))
        .route("/api/stats", get(dashboard::stats))
        .route("/api/logs", get(dashboard::list_logs))
        // 仓库 / 发票
        .route("/api/warehouses", get(entity::list_warehouses))
        .route("/api/warehouses/sync", post(entity::sync_warehouses))
        .route("/api/sales-invoices", get(entity::list_sales_invoices))
        .route("/api/sales-invoices/sync", post(entity::sync_sales_invoices))
        // 导入
        .route("/api/templates/{type}", get(import::download_template))
        .route("/api/imports/validate", post(import::validate_upload))
        .route(
            "/api/imports",
            get(import::list_imports).post(import::start_import),
        )
        .route("/api/imports/{id}", get(import::get_import))
        .route("/api/imports/{id}/cancel", post(import::cancel_import));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(api_routes)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::accurate::ConnectionStatus;
use crate::api::{ApiResult, DashboardStats};
use crate::app::state::AppState;
use crate::domain::ApiLog;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// 非数字时按缺省处理
    pub limit: Option<String>,
}

/// GET /api/status
pub async fn connection_status(State(state): State<AppState>) -> ApiResult<Json<ConnectionStatus>> {
    Ok(Json(state.dashboard_api.connection_status().await?))
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.dashboard_api.stats()?))
}

/// GET /api/logs?limit=N
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<Vec<ApiLog>>> {
    let limit = query.limit.and_then(|v| v.trim().parse::<i64>().ok());
    Ok(Json(state.dashboard_api.list_logs(limit)?))
}

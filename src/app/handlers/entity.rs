use axum::extract::State;
use axum::Json;

use crate::api::{ApiResult, SalesInvoiceSyncResult, WarehouseSyncResult};
use crate::app::state::AppState;
use crate::domain::{SalesInvoice, Warehouse};

pub async fn list_warehouses(State(state): State<AppState>) -> ApiResult<Json<Vec<Warehouse>>> {
    Ok(Json(state.entity_api.list_warehouses()?))
}

pub async fn sync_warehouses(State(state): State<AppState>) -> ApiResult<Json<WarehouseSyncResult>> {
    Ok(Json(state.entity_api.sync_warehouses().await?))
}

pub async fn list_sales_invoices(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SalesInvoice>>> {
    Ok(Json(state.entity_api.list_sales_invoices()?))
}

pub async fn sync_sales_invoices(
    State(state): State<AppState>,
) -> ApiResult<Json<SalesInvoiceSyncResult>> {
    Ok(Json(state.entity_api.sync_sales_invoices().await?))
}

// ==========================================
// Accurate 导入服务 - 导入相关处理器
// ==========================================

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::{ApiResult, ValidateResponse};
use crate::app::handlers::upload::read_upload;
use crate::app::state::AppState;
use crate::domain::ImportJob;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// GET /api/templates/{type}
pub async fn download_template(
    State(state): State<AppState>,
    Path(import_type): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let (file_name, bytes) = state.import_api.template(&import_type)?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    ))
}

/// POST /api/imports/validate
pub async fn validate_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ValidateResponse>> {
    let form = read_upload(multipart, state.config.max_upload_mb).await?;
    let result = state
        .import_api
        .validate_file(form.file, form.import_type.as_deref())?;
    Ok(Json(result))
}

/// POST /api/imports
pub async fn start_import(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportJob>> {
    let form = read_upload(multipart, state.config.max_upload_mb).await?;
    let job = state
        .import_api
        .start_import(form.file, form.import_type.as_deref())
        .await?;
    Ok(Json(job))
}

#[derive(Debug, Deserialize)]
pub struct ImportsQuery {
    pub status: Option<String>,
}

/// GET /api/imports?status=
pub async fn list_imports(
    State(state): State<AppState>,
    Query(query): Query<ImportsQuery>,
) -> ApiResult<Json<Vec<ImportJob>>> {
    Ok(Json(state.import_api.list_jobs(query.status.as_deref())?))
}

/// GET /api/imports/{id}
pub async fn get_import(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ImportJob>> {
    Ok(Json(state.import_api.get_job(id)?))
}

/// POST /api/imports/{id}/cancel
pub async fn cancel_import(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ImportJob>> {
    Ok(Json(state.import_api.cancel_job(id)?))
}

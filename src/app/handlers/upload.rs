// ==========================================
// Accurate 导入服务 - multipart 上传读取
// ==========================================
// 字段: file (文件), type (导入类型)
// 非 multipart 请求视为未上传文件
// ==========================================

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tracing::debug;

use crate::api::{ApiError, ApiResult, UploadedFile};

pub const FILE_FIELD: &str = "file";
pub const TYPE_FIELD: &str = "type";

/// 默认文件名 (客户端未提供时)
const FALLBACK_FILE_NAME: &str = "upload";

#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub import_type: Option<String>,
}

/// 读取上传表单
///
/// 超过大小上限时返回 PayloadTooLarge
pub async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
    max_upload_mb: usize,
) -> ApiResult<UploadForm> {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            debug!(error = %rejection, "请求不是 multipart 表单");
            return Ok(UploadForm::default());
        }
    };

    let to_api_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(max_upload_mb)
        } else {
            ApiError::InvalidInput(format!("Invalid multipart body: {}", e.body_text()))
        }
    };

    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(to_api_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .unwrap_or(FALLBACK_FILE_NAME)
                    .to_string();
                let bytes = field.bytes().await.map_err(to_api_error)?;
                debug!(file_name = %file_name, size = bytes.len(), "收到上传文件");
                form.file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            Some(TYPE_FIELD) => {
                form.import_type = Some(field.text().await.map_err(to_api_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

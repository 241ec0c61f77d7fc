// ==========================================
// Accurate 导入服务 - 导入 API
// ==========================================
// 职责: 模板下载 / 上传预校验 / 导入任务提交、查询、取消
// 请求检查顺序: 先文件, 后导入类型
// ==========================================

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::import_job::ImportJob;
use crate::domain::import_row::ImportRows;
use crate::domain::types::{ImportStatus, ImportType};
use crate::importer::SheetImporter;
use crate::pipeline::ImportQueue;
use crate::repository::ImportJobRepository;

/// 预校验返回的预览行数
pub const PREVIEW_ROWS: usize = 5;

/// 上传文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// ==========================================
// ValidateResponse - 预校验结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    pub record_count: usize,
    pub skipped_rows: usize,
    pub preview: ImportRows,
}

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    importer: Arc<SheetImporter>,
    queue: ImportQueue,
    jobs: Arc<ImportJobRepository>,
}

impl ImportApi {
    pub fn new(importer: Arc<SheetImporter>, queue: ImportQueue, jobs: Arc<ImportJobRepository>) -> Self {
        Self {
            importer,
            queue,
            jobs,
        }
    }

    /// 生成导入模板
    ///
    /// # 返回
    /// - (下载文件名, xlsx 字节)
    pub fn template(&self, import_type: &str) -> ApiResult<(&'static str, Vec<u8>)> {
        let import_type = parse_import_type(Some(import_type))?;
        let bytes = self.importer.generate_template(import_type)?;
        Ok((import_type.template_file_name(), bytes))
    }

    /// 解析并校验上传文件, 不写库
    pub fn validate_file(
        &self,
        file: Option<UploadedFile>,
        import_type: Option<&str>,
    ) -> ApiResult<ValidateResponse> {
        let file = file.ok_or(ApiError::NoFileUploaded)?;
        let import_type = parse_import_type(import_type)?;

        let sheet = self
            .importer
            .parse(import_type, &file.file_name, &file.bytes)?;
        let validation = self.importer.validate(&sheet.rows);

        info!(
            file_name = %file.file_name,
            import_type = %import_type,
            records = sheet.rows.len(),
            valid = validation.valid,
            "上传文件预校验完成"
        );

        Ok(ValidateResponse {
            valid: validation.valid,
            errors: validation.errors,
            record_count: sheet.rows.len(),
            skipped_rows: sheet.skipped_rows,
            preview: sheet.rows.preview(PREVIEW_ROWS),
        })
    }

    /// 创建 pending 任务并入队, 立即返回
    pub async fn start_import(
        &self,
        file: Option<UploadedFile>,
        import_type: Option<&str>,
    ) -> ApiResult<ImportJob> {
        let file = file.ok_or(ApiError::NoFileUploaded)?;
        let import_type = parse_import_type(import_type)?;

        let job = self
            .queue
            .submit(import_type, &file.file_name, file.bytes)
            .await?;
        Ok(job)
    }

    /// 任务列表, 新任务在前; 可按状态过滤
    pub fn list_jobs(&self, status: Option<&str>) -> ApiResult<Vec<ImportJob>> {
        match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => {
                let status = raw
                    .parse::<ImportStatus>()
                    .map_err(|_| ApiError::InvalidInput("Invalid job status".to_string()))?;
                Ok(self.jobs.list_by_status(status)?)
            }
            None => Ok(self.jobs.list()?),
        }
    }

    pub fn get_job(&self, id: i64) -> ApiResult<ImportJob> {
        self.jobs
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound("Import job not found".to_string()))
    }

    pub fn cancel_job(&self, id: i64) -> ApiResult<ImportJob> {
        Ok(self.queue.cancel(id)?)
    }
}

fn parse_import_type(value: Option<&str>) -> ApiResult<ImportType> {
    value
        .and_then(|v| v.trim().parse::<ImportType>().ok())
        .ok_or(ApiError::InvalidImportType)
}

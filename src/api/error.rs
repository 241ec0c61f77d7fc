// ==========================================
// Accurate 导入服务 - API层错误类型
// ==========================================
// 职责: 将仓储/导入/流水线错误转换为面向调用方的错误
// 说明: 错误信息直接返回给前端, 使用英文
// ==========================================

use crate::importer::error::ImportError;
use crate::pipeline::error::PipelineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Invalid import type")]
    InvalidImportType,

    #[error("{0}")]
    InvalidInput(String),

    #[error("File too large: max {0}MB allowed")]
    PayloadTooLarge(usize),

    /// 导入队列已满, 稍后重试
    #[error("{0}")]
    QueueFull(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// 远端返回失败信封
    #[error("{0}")]
    RemoteSyncFailed(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("{0}")]
    ImportError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} {} not found", entity, id))
            }
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::Conflict(format!("Invalid status transition: {} -> {}", from, to))
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::TemplateError(_) | ImportError::Other(_) => {
                ApiError::InternalError(err.to_string())
            }
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 PipelineError 转换
// ==========================================
impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::JobNotFound(_) => ApiError::NotFound("Import job not found".to_string()),
            PipelineError::JobNotPending { .. } => ApiError::Conflict(err.to_string()),
            PipelineError::QueueClosed => ApiError::InternalError(err.to_string()),
            PipelineError::QueueFull { .. } => ApiError::QueueFull(err.to_string()),
            PipelineError::Import(e) => e.into(),
            PipelineError::Repository(e) => e.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_mapping() {
        let err: ApiError = RepositoryError::InvalidStateTransition {
            from: "completed".to_string(),
            to: "failed".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_pipeline_error_mapping() {
        let err: ApiError = PipelineError::JobNotFound(3).into();
        assert_eq!(err.to_string(), "Import job not found");

        let err: ApiError = PipelineError::JobNotPending {
            id: 3,
            status: "processing".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = PipelineError::Import(ImportError::UnsupportedFormat("a.txt".into())).into();
        assert!(matches!(err, ApiError::ImportError(_)));

        let err: ApiError = PipelineError::QueueFull { capacity: 64 }.into();
        assert!(matches!(err, ApiError::QueueFull(_)));
        assert_eq!(
            err.to_string(),
            "Import queue is full (64 jobs waiting), try again later"
        );
    }
}

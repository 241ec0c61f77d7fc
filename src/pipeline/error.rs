// ==========================================
// Accurate 导入服务 - 导入流水线错误类型
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Import queue is closed")]
    QueueClosed,

    /// 排队任务数已达上限, 不阻塞调用方
    #[error("Import queue is full ({capacity} jobs waiting), try again later")]
    QueueFull { capacity: usize },

    #[error("Import job not found: {0}")]
    JobNotFound(i64),

    #[error("Import job {id} is {status}, only pending jobs can be cancelled")]
    JobNotPending { id: i64, status: String },

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

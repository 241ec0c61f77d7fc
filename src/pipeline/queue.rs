// ==========================================
// Accurate 导入服务 - 导入任务队列
// ==========================================
// 职责: 接收上传后创建的任务, 由单个 worker 逐个执行
// 约束:
// - 同一时刻最多一个任务处于 processing
// - 仅 pending 任务可取消; 运行中任务不可中断
// - 所有 ImportQueue 句柄释放后, worker 处理完剩余任务退出
// - 队列满时立即拒绝 (任务记为 failed), 不阻塞上传请求
// ==========================================

use crate::domain::import_job::ImportJob;
use crate::domain::types::ImportType;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::processor::{ImportJobProcessor, ImportTask};
use crate::repository::{ImportJobRepository, RepositoryError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

// ==========================================
// ImportQueue - 提交端
// ==========================================
#[derive(Clone)]
pub struct ImportQueue {
    sender: mpsc::Sender<ImportTask>,
    jobs: Arc<ImportJobRepository>,
}

// ==========================================
// ImportWorker - 消费端
// ==========================================
pub struct ImportWorker {
    receiver: mpsc::Receiver<ImportTask>,
    processor: Arc<ImportJobProcessor>,
}

impl ImportQueue {
    /// 创建队列与对应 worker
    pub fn channel(
        capacity: usize,
        processor: Arc<ImportJobProcessor>,
        jobs: Arc<ImportJobRepository>,
    ) -> (ImportQueue, ImportWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            ImportQueue { sender, jobs },
            ImportWorker {
                receiver,
                processor,
            },
        )
    }

    /// 创建 pending 任务并入队, 立即返回任务快照
    pub async fn submit(
        &self,
        import_type: ImportType,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> PipelineResult<ImportJob> {
        let job = self.jobs.create(import_type, file_name)?;

        let task = ImportTask {
            job_id: job.id,
            import_type,
            file_name: file_name.to_string(),
            bytes,
        };

        if let Err(e) = self.sender.try_send(task) {
            let rejected = match e {
                TrySendError::Full(_) => PipelineError::QueueFull {
                    capacity: self.sender.max_capacity(),
                },
                TrySendError::Closed(_) => PipelineError::QueueClosed,
            };
            warn!(job_id = job.id, error = %rejected, "导入任务未能入队");
            self.jobs.fail(job.id, &rejected.to_string())?;
            return Err(rejected);
        }

        info!(job_id = job.id, import_type = %import_type, file_name, "导入任务已入队");
        Ok(job)
    }

    /// 取消排队中的任务
    pub fn cancel(&self, job_id: i64) -> PipelineResult<ImportJob> {
        match self.jobs.cancel_pending(job_id) {
            Ok(job) => {
                info!(job_id, "导入任务已取消");
                Ok(job)
            }
            Err(RepositoryError::NotFound { .. }) => Err(PipelineError::JobNotFound(job_id)),
            Err(RepositoryError::InvalidStateTransition { from, .. }) => {
                Err(PipelineError::JobNotPending {
                    id: job_id,
                    status: from,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ImportWorker {
    /// 逐个执行任务, 直到通道关闭且排空
    pub async fn run(mut self) {
        info!("导入 worker 启动");
        while let Some(task) = self.receiver.recv().await {
            let job_id = task.job_id;
            if let Err(e) = self.processor.run(task).await {
                error!(job_id, error = %e, "导入任务无法写回状态");
            }
        }
        info!("导入队列已关闭, worker 退出");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

// ==========================================
// Accurate 导入服务 - 导入任务流水线
// ==========================================
// 职责: 任务排队 / 逐行远端同步 / 进度写回
// 状态机: pending -> processing -> completed | failed
// ==========================================

pub mod error;
pub mod processor;
pub mod queue;

pub use error::{PipelineError, PipelineResult};
pub use processor::{
    CheckedSalesInvoice, ImportJobProcessor, ImportTask, LocalStores, RemoteRecord, SyncableRow,
};
pub use queue::{ImportQueue, ImportWorker};

// ==========================================
// Accurate 导入服务 - 导入任务处理器
// ==========================================
// 流程:
// 1. pending -> processing (startedAt)
// 2. 解析文件, 记录 totalRecords
// 3. 逐行: 规则检查 -> 远端保存 -> 本地落库 -> 写回进度
// 4. completed; 任意逃逸错误 -> failed (错误列表替换为单条)
// 红线: 行严格串行处理, 每行处理后立即写回进度
// ==========================================

use crate::accurate::envelope::Envelope;
use crate::accurate::gateway::AccurateGateway;
use crate::accurate::models::{SalesInvoiceDraft, SavedRecord};
use crate::domain::import_job::JobProgress;
use crate::domain::import_row::{ImportRows, SalesInvoiceRow, WarehouseRow};
use crate::domain::sales_invoice::{to_minor_units, NewSalesInvoice};
use crate::domain::types::{ImportStatus, ImportType};
use crate::domain::warehouse::NewWarehouse;
use crate::importer::import_trait::{row_line, RowValidator};
use crate::importer::row_validator::parse_date;
use crate::importer::SheetImporter;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::repository::{
    ImportJobRepository, RepositoryError, RepositoryResult, SalesInvoiceRepository,
    WarehouseRepository,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// ImportTask - 队列中的导入任务
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportTask {
    pub job_id: i64,
    pub import_type: ImportType,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 本地落库所需仓储
pub struct LocalStores {
    pub warehouses: Arc<WarehouseRepository>,
    pub sales_invoices: Arc<SalesInvoiceRepository>,
}

// ==========================================
// SyncableRow - 可同步到远端的导入行
// ==========================================
// 行先经静态规则检查, 只有检查通过得到的记录才会发往远端
pub trait SyncableRow: Send + Sync {
    type Record: RemoteRecord;

    /// 错误信息中使用的行标识
    fn ident(&self) -> &str;

    /// 失败时返回该行的全部校验信息
    fn check(&self, validator: &dyn RowValidator, line: usize) -> Result<Self::Record, Vec<String>>;
}

#[async_trait]
pub trait RemoteRecord: Send + Sync {
    async fn push_remote(&self, gateway: &dyn AccurateGateway) -> Envelope<SavedRecord>;

    fn store_local(&self, accurate_id: &str, stores: &LocalStores) -> RepositoryResult<()>;
}

impl SyncableRow for WarehouseRow {
    type Record = WarehouseRow;

    fn ident(&self) -> &str {
        &self.name
    }

    fn check(&self, validator: &dyn RowValidator, line: usize) -> Result<WarehouseRow, Vec<String>> {
        let errors = validator.check_warehouse(self, line);
        if errors.is_empty() {
            Ok(self.clone())
        } else {
            Err(errors)
        }
    }
}

#[async_trait]
impl RemoteRecord for WarehouseRow {
    async fn push_remote(&self, gateway: &dyn AccurateGateway) -> Envelope<SavedRecord> {
        gateway
            .save_warehouse(&self.name, self.description.as_deref())
            .await
    }

    fn store_local(&self, accurate_id: &str, stores: &LocalStores) -> RepositoryResult<()> {
        stores.warehouses.create(&NewWarehouse {
            accurate_id: Some(accurate_id.to_string()),
            name: self.name.clone(),
            description: self.description.clone(),
        })?;
        Ok(())
    }
}

/// 通过检查的发票行: 金额与日期已解析
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedSalesInvoice {
    pub invoice_number: String,
    pub customer_name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub status: String,
}

impl SyncableRow for SalesInvoiceRow {
    type Record = CheckedSalesInvoice;

    fn ident(&self) -> &str {
        &self.invoice_number
    }

    fn check(
        &self,
        validator: &dyn RowValidator,
        line: usize,
    ) -> Result<CheckedSalesInvoice, Vec<String>> {
        let errors = validator.check_sales_invoice(self, line);
        if !errors.is_empty() {
            return Err(errors);
        }

        // 自定义校验器可能放过无法解析的值, 这里不做任何兜底转换
        match (self.amount_value(), parse_date(&self.date)) {
            (Some(amount), Some(date)) => Ok(CheckedSalesInvoice {
                invoice_number: self.invoice_number.clone(),
                customer_name: self.customer_name.clone(),
                amount,
                date,
                status: self.status_or_default().to_string(),
            }),
            _ => Err(vec![format!(
                "Row {}: Amount and date must be readable values",
                line
            )]),
        }
    }
}

#[async_trait]
impl RemoteRecord for CheckedSalesInvoice {
    async fn push_remote(&self, gateway: &dyn AccurateGateway) -> Envelope<SavedRecord> {
        // 远端日期格式 DD/MM/YYYY
        let draft = SalesInvoiceDraft {
            number: self.invoice_number.clone(),
            customer_name: self.customer_name.clone(),
            trans_date: self.date.format("%d/%m/%Y").to_string(),
            amount: self.amount,
            status: self.status.clone(),
        };
        gateway.save_sales_invoice(&draft).await
    }

    fn store_local(&self, accurate_id: &str, stores: &LocalStores) -> RepositoryResult<()> {
        stores.sales_invoices.create(&NewSalesInvoice {
            accurate_id: Some(accurate_id.to_string()),
            invoice_number: self.invoice_number.clone(),
            customer_name: self.customer_name.clone(),
            amount: to_minor_units(self.amount),
            status: self.status.clone(),
            date: self.date.format("%Y-%m-%d").to_string(),
        })?;
        Ok(())
    }
}

// ==========================================
// ImportJobProcessor - 单任务执行器
// ==========================================
pub struct ImportJobProcessor {
    importer: Arc<SheetImporter>,
    gateway: Arc<dyn AccurateGateway>,
    jobs: Arc<ImportJobRepository>,
    stores: LocalStores,
    max_job_errors: usize,
}

impl ImportJobProcessor {
    pub fn new(
        importer: Arc<SheetImporter>,
        gateway: Arc<dyn AccurateGateway>,
        jobs: Arc<ImportJobRepository>,
        stores: LocalStores,
        max_job_errors: usize,
    ) -> Self {
        Self {
            importer,
            gateway,
            jobs,
            stores,
            max_job_errors,
        }
    }

    /// 执行一个导入任务
    ///
    /// # 返回
    /// - Ok(()): 任务已到达终态 (或已被取消而跳过)
    /// - Err: 连任务状态都无法写回 (存储故障)
    #[instrument(skip(self, task), fields(job_id = task.job_id, import_type = %task.import_type))]
    pub async fn run(&self, task: ImportTask) -> PipelineResult<()> {
        let job = self
            .jobs
            .find_by_id(task.job_id)?
            .ok_or(PipelineError::JobNotFound(task.job_id))?;

        if job.status != ImportStatus::Pending {
            info!(status = %job.status, "任务已不在排队状态, 跳过");
            return Ok(());
        }

        // 取消与启动之间的竞争由仓储层状态校验兜底
        match self.jobs.start(task.job_id) {
            Ok(()) => {}
            Err(RepositoryError::InvalidStateTransition { from, .. }) => {
                info!(status = %from, "任务已被取消, 跳过");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
        info!(file_name = %task.file_name, "导入任务开始");

        match self.process(&task).await {
            Ok(progress) => {
                self.jobs.complete(task.job_id, &progress.finalize_errors())?;
                info!(
                    total = progress.total,
                    successful = progress.successful,
                    failed = progress.failed,
                    "导入任务完成"
                );
            }
            Err(e) => {
                error!(error = %e, "导入任务失败");
                self.jobs.fail(task.job_id, &e.to_string())?;
            }
        }
        Ok(())
    }

    async fn process(&self, task: &ImportTask) -> PipelineResult<JobProgress> {
        let sheet = self
            .importer
            .parse(task.import_type, &task.file_name, &task.bytes)?;

        self.jobs.set_total(task.job_id, sheet.rows.len() as i64)?;
        debug!(
            total = sheet.rows.len(),
            skipped_rows = sheet.skipped_rows,
            "解析完成, 开始逐行同步"
        );

        match &sheet.rows {
            ImportRows::Warehouses(rows) => self.sync_rows(task.job_id, rows).await,
            ImportRows::SalesInvoices(rows) => self.sync_rows(task.job_id, rows).await,
        }
    }

    async fn sync_rows<R: SyncableRow>(&self, job_id: i64, rows: &[R]) -> PipelineResult<JobProgress> {
        let mut progress = JobProgress::new(rows.len(), self.max_job_errors);

        for (index, row) in rows.iter().enumerate() {
            let ident = row.ident();

            let record = match row.check(self.importer.validator(), row_line(index)) {
                Ok(record) => record,
                Err(problems) => {
                    warn!(row = index + 1, ident, "行校验未通过, 不发往远端");
                    progress.record_failure(format!(
                        "Invalid data for {}: {}",
                        ident,
                        problems.join("; ")
                    ));
                    self.jobs.update_progress(job_id, &progress)?;
                    continue;
                }
            };

            let envelope = record.push_remote(self.gateway.as_ref()).await;

            match envelope.into_result() {
                Ok(saved) => match record.store_local(&saved.id, &self.stores) {
                    Ok(()) => {
                        debug!(row = index + 1, ident, accurate_id = %saved.id, "行同步成功");
                        progress.record_success();
                    }
                    Err(e) => {
                        warn!(row = index + 1, ident, error = %e, "远端已保存, 本地落库失败");
                        progress.record_failure(format!(
                            "Saved {} remotely (id {}) but failed to store locally: {}",
                            ident, saved.id, e
                        ));
                    }
                },
                Err(message) => {
                    warn!(row = index + 1, ident, error = %message, "远端保存失败");
                    progress.record_failure(format!("Failed to save {}: {}", ident, message));
                }
            }

            self.jobs.update_progress(job_id, &progress)?;
        }

        Ok(progress)
    }
}

// ==========================================
// 导入任务流水线集成测试
// ==========================================
// 覆盖: 逐行同步计数 / 进度快照不变量 / 解析失败 / 取消 / 本地落库失败 / 错误上限
// ==========================================

use std::sync::{Arc, Mutex};

use accurate_import::db::SharedConnection;
use accurate_import::domain::{ImportStatus, ImportType};
use accurate_import::importer::SheetImporter;
use accurate_import::pipeline::{
    ImportJobProcessor, ImportQueue, LocalStores, PipelineError,
};
use accurate_import::repository::{
    ImportJobRepository, SalesInvoiceRepository, WarehouseRepository, CANCELLED_MESSAGE,
};
use tokio::sync::Notify;

use test_helpers::{
    create_test_store, sales_invoice_workbook, wait_for_terminal, wait_until,
    warehouse_workbook, MockGateway,
};

struct Harness {
    conn: SharedConnection,
    queue: ImportQueue,
    jobs: Arc<ImportJobRepository>,
    warehouses: Arc<WarehouseRepository>,
    sales_invoices: Arc<SalesInvoiceRepository>,
}

fn start_pipeline(gateway: Arc<MockGateway>, max_job_errors: usize) -> Harness {
    start_pipeline_with_capacity(gateway, max_job_errors, 8)
}

fn start_pipeline_with_capacity(
    gateway: Arc<MockGateway>,
    max_job_errors: usize,
    capacity: usize,
) -> Harness {
    accurate_import::logging::init_test();
    let conn = create_test_store();
    let jobs = Arc::new(ImportJobRepository::new(conn.clone()));
    let warehouses = Arc::new(WarehouseRepository::new(conn.clone()));
    let sales_invoices = Arc::new(SalesInvoiceRepository::new(conn.clone()));

    let processor = Arc::new(ImportJobProcessor::new(
        Arc::new(SheetImporter::default()),
        gateway,
        jobs.clone(),
        LocalStores {
            warehouses: warehouses.clone(),
            sales_invoices: sales_invoices.clone(),
        },
        max_job_errors,
    ));
    let (queue, worker) = ImportQueue::channel(capacity, processor, jobs.clone());
    worker.spawn();

    Harness {
        conn,
        queue,
        jobs,
        warehouses,
        sales_invoices,
    }
}

#[tokio::test]
async fn test_row_failure_does_not_abort_job() {
    println!("\n=== 第 2 行远端失败, 任务仍完成 ===\n");

    let gateway = Arc::new(MockGateway::new().fail_on("INV-2", "Nomor faktur sudah digunakan"));
    let h = start_pipeline(gateway.clone(), 500);

    let bytes = sales_invoice_workbook(&[
        vec!["INV-1", "PT Sinar", "1500000", "2024-01-15", "paid"],
        vec!["INV-2", "PT Maju", "250000", "2024-01-16", ""],
        vec!["INV-3", "CV Abadi", "1234.56", "16/01/2024", "pending"],
    ]);

    let job = h
        .queue
        .submit(ImportType::SalesInvoice, "invoices.xlsx", bytes)
        .await
        .unwrap();
    assert_eq!(job.status, ImportStatus::Pending);
    println!("✓ 任务已创建: id={}", job.id);

    let job = wait_for_terminal(&h.jobs, job.id).await;
    assert_eq!(job.status, ImportStatus::Completed);
    assert_eq!(job.total_records, 3);
    assert_eq!(job.processed_records, 3);
    assert_eq!(job.successful_records, 2);
    assert_eq!(job.failed_records, 1);
    assert_eq!(
        job.errors,
        vec!["Failed to save INV-2: Nomor faktur sudah digunakan".to_string()]
    );
    assert!(job.started_at.is_some());
    assert!(job.completed_at.is_some());
    println!("✓ 计数: 3/2/1");

    // 本地仅保存成功行, 金额为最小货币单位, 日期统一格式
    let invoices = h.sales_invoices.list().unwrap();
    assert_eq!(invoices.len(), 2);
    let inv3 = invoices.iter().find(|i| i.invoice_number == "INV-3").unwrap();
    assert_eq!(inv3.amount, 123456);
    assert_eq!(inv3.date, "2024-01-16");
    assert_eq!(inv3.status, "pending");
    assert!(inv3.accurate_id.is_some());

    // 远端收到 DD/MM/YYYY
    let drafts = gateway.saved_invoices.lock().unwrap().clone();
    assert_eq!(drafts[0].trans_date, "15/01/2024");
    assert_eq!(drafts[0].amount, 1500000.0);
}

#[tokio::test]
async fn test_invalid_rows_are_rejected_before_remote_save() {
    println!("\n=== 无效行不发往远端, 计为失败 ===\n");

    let gateway = Arc::new(MockGateway::new());
    let h = start_pipeline(gateway.clone(), 500);

    let bytes = sales_invoice_workbook(&[
        vec!["INV-1", "PT Sinar", "abc", "not-a-date", ""],
        vec!["INV-2", "PT Maju", "2500", "2024-01-16", ""],
    ]);
    let job = h
        .queue
        .submit(ImportType::SalesInvoice, "invoices.xlsx", bytes)
        .await
        .unwrap();

    let job = wait_for_terminal(&h.jobs, job.id).await;
    assert_eq!(job.status, ImportStatus::Completed);
    assert_eq!(job.processed_records, 2);
    assert_eq!(job.successful_records, 1);
    assert_eq!(job.failed_records, 1);
    assert_eq!(
        job.errors,
        vec![
            "Invalid data for INV-1: Row 2: Amount must be a valid number; \
             Row 2: Date must be in valid format (YYYY-MM-DD)"
                .to_string()
        ]
    );
    println!("✓ 错误: {:?}", job.errors);

    // 远端只收到有效行
    let drafts = gateway.saved_invoices.lock().unwrap().clone();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].number, "INV-2");

    // 本地没有金额为 0 的记录
    let invoices = h.sales_invoices.list().unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].invoice_number, "INV-2");
    assert_eq!(invoices[0].amount, 250000);
}

#[tokio::test]
async fn test_progress_snapshots_keep_counters_consistent() {
    let gateway = Arc::new(MockGateway::new().fail_on("W3", "boom"));
    let h = start_pipeline(gateway.clone(), 500);

    let violations: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    {
        let jobs = h.jobs.clone();
        let violations = violations.clone();
        gateway.set_hook(move |ident| {
            for job in jobs.list().unwrap() {
                if job.status != ImportStatus::Pending && !job.counters_consistent() {
                    violations
                        .lock()
                        .unwrap()
                        .push(format!("{}: {:?}", ident, job));
                }
            }
        });
    }

    let rows: Vec<Vec<&str>> = vec![
        vec!["W1", ""],
        vec!["W2", ""],
        vec!["W3", ""],
        vec!["W4", ""],
        vec!["W5", ""],
    ];
    let job = h
        .queue
        .submit(ImportType::Warehouse, "w.xlsx", warehouse_workbook(&rows))
        .await
        .unwrap();

    let job = wait_for_terminal(&h.jobs, job.id).await;
    assert!(job.counters_consistent());
    assert_eq!(job.processed_records, job.total_records);
    assert!(violations.lock().unwrap().is_empty());
    assert_eq!(h.warehouses.count().unwrap(), 4);
}

#[tokio::test]
async fn test_parse_failure_fails_job_with_single_error() {
    let h = start_pipeline(Arc::new(MockGateway::new()), 500);

    let job = h
        .queue
        .submit(ImportType::Warehouse, "broken.xlsx", b"definitely not a workbook".to_vec())
        .await
        .unwrap();

    let job = wait_for_terminal(&h.jobs, job.id).await;
    assert_eq!(job.status, ImportStatus::Failed);
    assert_eq!(job.errors.len(), 1);
    assert!(job.errors[0].starts_with("Failed to parse Excel file"));
    assert_eq!(job.processed_records, 0);
    assert!(job.completed_at.is_some());
}

#[tokio::test]
async fn test_cancel_pending_job_only() {
    println!("\n=== 仅排队中任务可取消 ===\n");

    let gateway = Arc::new(MockGateway::new());
    let gate = Arc::new(Notify::new());
    gateway.set_gate(gate.clone());
    let h = start_pipeline(gateway.clone(), 500);

    let running = h
        .queue
        .submit(ImportType::Warehouse, "a.xlsx", warehouse_workbook(&[vec!["A", ""]]))
        .await
        .unwrap();
    wait_until(&h.jobs, running.id, |j| j.status == ImportStatus::Processing).await;
    println!("✓ 任务 A 运行中");

    let queued = h
        .queue
        .submit(ImportType::Warehouse, "b.xlsx", warehouse_workbook(&[vec!["B", ""]]))
        .await
        .unwrap();

    let cancelled = h.queue.cancel(queued.id).unwrap();
    assert_eq!(cancelled.status, ImportStatus::Failed);
    assert_eq!(cancelled.errors, vec![CANCELLED_MESSAGE.to_string()]);
    println!("✓ 任务 B 已取消");

    let err = h.queue.cancel(running.id).unwrap_err();
    assert!(matches!(err, PipelineError::JobNotPending { .. }));

    let err = h.queue.cancel(9999).unwrap_err();
    assert!(matches!(err, PipelineError::JobNotFound(9999)));

    gate.notify_one();
    let finished = wait_for_terminal(&h.jobs, running.id).await;
    assert_eq!(finished.status, ImportStatus::Completed);

    // 被取消的任务出队后被跳过
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let skipped = h.jobs.find_by_id(queued.id).unwrap().unwrap();
    assert_eq!(skipped.status, ImportStatus::Failed);
    assert_eq!(skipped.processed_records, 0);
    assert_eq!(gateway.saved_warehouses.lock().unwrap().clone(), vec!["A".to_string()]);
}

#[tokio::test]
async fn test_local_store_failure_is_distinct_row_error() {
    let gateway = Arc::new(MockGateway::new());
    let h = start_pipeline(gateway.clone(), 500);

    {
        let conn = h.conn.clone();
        gateway.set_hook(move |_| {
            let _ = conn
                .lock()
                .unwrap()
                .execute_batch("DROP TABLE IF EXISTS warehouses");
        });
    }

    let job = h
        .queue
        .submit(ImportType::Warehouse, "w.xlsx", warehouse_workbook(&[vec!["Main", "x"]]))
        .await
        .unwrap();

    let job = wait_for_terminal(&h.jobs, job.id).await;
    assert_eq!(job.status, ImportStatus::Completed);
    assert_eq!(job.failed_records, 1);
    assert_eq!(job.errors.len(), 1);
    assert!(job.errors[0].starts_with("Saved Main remotely (id 1000) but failed to store locally"));
}

#[tokio::test]
async fn test_error_list_is_capped() {
    let gateway = MockGateway::new()
        .fail_on("W1", "e1")
        .fail_on("W2", "e2")
        .fail_on("W3", "e3")
        .fail_on("W4", "e4");
    let h = start_pipeline(Arc::new(gateway), 2);

    let rows: Vec<Vec<&str>> = vec![
        vec!["W1", ""],
        vec!["W2", ""],
        vec!["W3", ""],
        vec!["W4", ""],
    ];
    let job = h
        .queue
        .submit(ImportType::Warehouse, "w.xlsx", warehouse_workbook(&rows))
        .await
        .unwrap();

    let job = wait_for_terminal(&h.jobs, job.id).await;
    assert_eq!(job.failed_records, 4);
    assert_eq!(
        job.errors,
        vec![
            "Failed to save W1: e1".to_string(),
            "Failed to save W2: e2".to_string(),
            "... and 2 more errors".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_full_queue_rejects_without_blocking() {
    println!("\n=== 队列已满: 立即拒绝 ===\n");

    let gateway = Arc::new(MockGateway::new());
    let gate = Arc::new(Notify::new());
    gateway.set_gate(gate.clone());
    let h = start_pipeline_with_capacity(gateway.clone(), 500, 1);

    let running = h
        .queue
        .submit(ImportType::Warehouse, "a.xlsx", warehouse_workbook(&[vec!["A", ""]]))
        .await
        .unwrap();
    wait_until(&h.jobs, running.id, |j| j.status == ImportStatus::Processing).await;

    // 占满唯一的排队位
    let queued = h
        .queue
        .submit(ImportType::Warehouse, "b.xlsx", warehouse_workbook(&[vec!["B", ""]]))
        .await
        .unwrap();

    let err = tokio::time::timeout(
        std::time::Duration::from_secs(1),
        h.queue
            .submit(ImportType::Warehouse, "c.xlsx", warehouse_workbook(&[vec!["C", ""]])),
    )
    .await
    .expect("提交不应阻塞")
    .unwrap_err();
    assert!(matches!(err, PipelineError::QueueFull { capacity: 1 }));
    println!("✓ 第三个任务被拒绝: {}", err);

    // 被拒绝的任务不会停留在 pending
    let rejected = h.jobs.list().unwrap().into_iter().find(|j| j.file_name == "c.xlsx").unwrap();
    assert_eq!(rejected.status, ImportStatus::Failed);
    assert_eq!(rejected.errors, vec![err.to_string()]);

    gate.notify_one();
    wait_for_terminal(&h.jobs, running.id).await;
    gate.notify_one();
    let finished = wait_for_terminal(&h.jobs, queued.id).await;
    assert_eq!(finished.status, ImportStatus::Completed);
}

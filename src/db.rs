// ==========================================
// Accurate 导入服务 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一 PRAGMA 行为与 busy_timeout
// - 启动时建表 (默认内存库, 进程重启不保留数据)
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 内存库路径
pub const IN_MEMORY_PATH: &str = ":memory:";

/// 共享连接句柄 (仓储层共用)
pub type SharedConnection = Arc<Mutex<Connection>>;

/// 建表语句
///
/// 说明：accurate_id 不加 UNIQUE 约束, 同步流程为"先查后插"
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS warehouses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    accurate_id TEXT,
    name TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sales_invoices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    accurate_id TEXT,
    invoice_number TEXT NOT NULL,
    customer_name TEXT NOT NULL,
    amount INTEGER NOT NULL,
    status TEXT NOT NULL,
    date TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS import_jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    import_type TEXT NOT NULL,
    file_name TEXT NOT NULL,
    status TEXT NOT NULL,
    total_records INTEGER NOT NULL DEFAULT 0,
    processed_records INTEGER NOT NULL DEFAULT 0,
    successful_records INTEGER NOT NULL DEFAULT 0,
    failed_records INTEGER NOT NULL DEFAULT 0,
    errors TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    started_at TEXT,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS api_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    endpoint TEXT NOT NULL,
    method TEXT NOT NULL,
    status_code INTEGER NOT NULL,
    response_time INTEGER NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_warehouses_accurate_id ON warehouses(accurate_id);
CREATE INDEX IF NOT EXISTS idx_sales_invoices_accurate_id ON sales_invoices(accurate_id);
CREATE INDEX IF NOT EXISTS idx_import_jobs_status ON import_jobs(status);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = if db_path == IN_MEMORY_PATH {
        Connection::open_in_memory()?
    } else {
        Connection::open(db_path)?
    };
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表 (幂等)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// 打开并初始化存储, 返回共享连接句柄
pub fn open_store(db_path: &str) -> rusqlite::Result<SharedConnection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    tracing::info!(db_path = %db_path, "存储初始化完成");
    Ok(Arc::new(Mutex::new(conn)))
}

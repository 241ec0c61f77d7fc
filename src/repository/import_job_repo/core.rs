use crate::domain::import_job::{ImportJob, JobProgress};
use crate::domain::types::{ImportStatus, ImportType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

/// 排队中被取消的任务的唯一错误信息
pub const CANCELLED_MESSAGE: &str = "Import cancelled before processing";

const SELECT_COLUMNS: &str = r#"
    id, import_type, file_name, status,
    total_records, processed_records, successful_records, failed_records,
    errors, created_at, started_at, completed_at
"#;

// ==========================================
// ImportJobRepository - 导入任务仓储
// ==========================================
pub struct ImportJobRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImportJobRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ImportJob> {
        let import_type: String = row.get(1)?;
        let status: String = row.get(3)?;
        let errors: String = row.get(8)?;

        Ok(ImportJob {
            id: row.get(0)?,
            import_type: import_type
                .parse::<ImportType>()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, e.into()))?,
            file_name: row.get(2)?,
            status: status
                .parse::<ImportStatus>()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?,
            total_records: row.get(4)?,
            processed_records: row.get(5)?,
            successful_records: row.get(6)?,
            failed_records: row.get(7)?,
            errors: serde_json::from_str(&errors)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?,
            created_at: row.get(9)?,
            started_at: row.get(10)?,
            completed_at: row.get(11)?,
        })
    }

    fn not_found(id: i64) -> RepositoryError {
        RepositoryError::NotFound {
            entity: "Import job",
            id,
        }
    }

    /// 读取当前状态并校验转换是否合法 (调用方持锁)
    fn check_transition(conn: &Connection, id: i64, next: ImportStatus) -> RepositoryResult<()> {
        let current: Option<String> = conn
            .query_row(
                "SELECT status FROM import_jobs WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let current = current.ok_or_else(|| Self::not_found(id))?;
        let current = current
            .parse::<ImportStatus>()
            .map_err(|message| RepositoryError::CorruptColumn {
                column: "status",
                message,
            })?;

        if !current.can_transition_to(next) {
            return Err(RepositoryError::InvalidStateTransition {
                from: current.to_string(),
                to: next.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 创建 pending 任务
    pub fn create(&self, import_type: ImportType, file_name: &str) -> RepositoryResult<ImportJob> {
        let conn = self.get_conn()?;
        let created_at = Utc::now();

        conn.execute(
            r#"
            INSERT INTO import_jobs (import_type, file_name, status, errors, created_at)
            VALUES (?1, ?2, ?3, '[]', ?4)
            "#,
            params![
                import_type.as_str(),
                file_name,
                ImportStatus::Pending.as_str(),
                created_at
            ],
        )?;

        Ok(ImportJob {
            id: conn.last_insert_rowid(),
            import_type,
            file_name: file_name.to_string(),
            status: ImportStatus::Pending,
            total_records: 0,
            processed_records: 0,
            successful_records: 0,
            failed_records: 0,
            errors: Vec::new(),
            created_at,
            started_at: None,
            completed_at: None,
        })
    }

    /// pending -> processing
    pub fn start(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::check_transition(&conn, id, ImportStatus::Processing)?;
        conn.execute(
            "UPDATE import_jobs SET status = ?1, started_at = ?2 WHERE id = ?3",
            params![ImportStatus::Processing.as_str(), Utc::now(), id],
        )?;
        Ok(())
    }

    /// 记录总行数 (解析完成后)
    pub fn set_total(&self, id: i64, total: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE import_jobs SET total_records = ?1 WHERE id = ?2",
            params![total, id],
        )?;
        if rows == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    /// 写回进度计数与错误列表 (每行处理后调用)
    pub fn update_progress(&self, id: i64, progress: &JobProgress) -> RepositoryResult<()> {
        let errors = serde_json::to_string(&progress.errors)?;
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE import_jobs SET
                total_records = ?1, processed_records = ?2,
                successful_records = ?3, failed_records = ?4, errors = ?5
            WHERE id = ?6
            "#,
            params![
                progress.total,
                progress.processed,
                progress.successful,
                progress.failed,
                errors,
                id
            ],
        )?;
        if rows == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    /// processing -> completed
    pub fn complete(&self, id: i64, errors: &[String]) -> RepositoryResult<()> {
        let errors = serde_json::to_string(errors)?;
        let conn = self.get_conn()?;
        Self::check_transition(&conn, id, ImportStatus::Completed)?;
        conn.execute(
            "UPDATE import_jobs SET status = ?1, errors = ?2, completed_at = ?3 WHERE id = ?4",
            params![ImportStatus::Completed.as_str(), errors, Utc::now(), id],
        )?;
        Ok(())
    }

    /// -> failed, 错误列表替换为单条信息
    pub fn fail(&self, id: i64, message: &str) -> RepositoryResult<()> {
        let errors = serde_json::to_string(&[message])?;
        let conn = self.get_conn()?;
        Self::check_transition(&conn, id, ImportStatus::Failed)?;
        conn.execute(
            "UPDATE import_jobs SET status = ?1, errors = ?2, completed_at = ?3 WHERE id = ?4",
            params![ImportStatus::Failed.as_str(), errors, Utc::now(), id],
        )?;
        Ok(())
    }

    /// 取消排队中的任务 (仅 pending 可取消)
    pub fn cancel_pending(&self, id: i64) -> RepositoryResult<ImportJob> {
        {
            let conn = self.get_conn()?;
            let status: Option<String> = conn
                .query_row(
                    "SELECT status FROM import_jobs WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;
            let status = status.ok_or_else(|| Self::not_found(id))?;
            if status != ImportStatus::Pending.as_str() {
                return Err(RepositoryError::InvalidStateTransition {
                    from: status,
                    to: ImportStatus::Failed.to_string(),
                });
            }

            let errors = serde_json::to_string(&[CANCELLED_MESSAGE])?;
            conn.execute(
                "UPDATE import_jobs SET status = ?1, errors = ?2, completed_at = ?3 WHERE id = ?4",
                params![ImportStatus::Failed.as_str(), errors, Utc::now(), id],
            )?;
        }
        self.find_by_id(id)?.ok_or_else(|| Self::not_found(id))
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ImportJob>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM import_jobs WHERE id = ?1", SELECT_COLUMNS);
        Ok(conn.query_row(&sql, params![id], Self::map_row).optional()?)
    }

    /// 按创建时间倒序
    pub fn list(&self) -> RepositoryResult<Vec<ImportJob>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM import_jobs ORDER BY id DESC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let jobs = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    pub fn list_by_status(&self, status: ImportStatus) -> RepositoryResult<Vec<ImportJob>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM import_jobs WHERE status = ?1 ORDER BY id DESC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let jobs = stmt
            .query_map(params![status.as_str()], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM import_jobs", [], |row| row.get(0))?)
    }

    pub fn count_by_status(&self, status: ImportStatus) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM import_jobs WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?)
    }
}

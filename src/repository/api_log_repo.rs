// ==========================================
// Accurate 导入服务 - API 调用日志仓储
// ==========================================
// 对齐: api_logs 表
// 仅追加, 按时间倒序读取
// ==========================================

use crate::domain::api_log::{ApiLog, NewApiLog};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct ApiLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ApiLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ApiLog> {
        Ok(ApiLog {
            id: row.get(0)?,
            endpoint: row.get(1)?,
            method: row.get(2)?,
            status_code: row.get(3)?,
            response_time: row.get(4)?,
            timestamp: row.get(5)?,
        })
    }

    pub fn append(&self, log: &NewApiLog) -> RepositoryResult<ApiLog> {
        let conn = self.get_conn()?;
        let timestamp = Utc::now();

        conn.execute(
            r#"
            INSERT INTO api_logs (endpoint, method, status_code, response_time, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                log.endpoint,
                log.method,
                log.status_code,
                log.response_time,
                timestamp
            ],
        )?;

        Ok(ApiLog {
            id: conn.last_insert_rowid(),
            endpoint: log.endpoint.clone(),
            method: log.method.clone(),
            status_code: log.status_code,
            response_time: log.response_time,
            timestamp,
        })
    }

    /// 最新的 limit 条日志
    pub fn list(&self, limit: usize) -> RepositoryResult<Vec<ApiLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, endpoint, method, status_code, response_time, timestamp
            FROM api_logs
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;
        let logs = stmt
            .query_map(params![limit as i64], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }
}

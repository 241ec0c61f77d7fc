// ==========================================
// Accurate 导入服务 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 上层 (API/流水线) 依据变体区分 404 / 409 / 500
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    /// 任务状态机拒绝的转换
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    /// 列内容无法还原为领域值 (状态文本 / 错误列表 JSON)
    #[error("列 {column} 数据损坏: {message}")]
    CorruptColumn { column: &'static str, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            other => RepositoryError::DatabaseQueryError(other.to_string()),
        }
    }
}

// errors 列以 JSON 文本存储
impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::CorruptColumn {
            column: "errors",
            message: err.to_string(),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = RepositoryError::NotFound {
            entity: "Import job",
            id: 7,
        };
        assert_eq!(err.to_string(), "Import job 7 not found");
    }

    #[test]
    fn test_sqlite_error_maps_to_query_error() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: RepositoryError = conn.execute("SELECT * FROM missing", []).unwrap_err().into();
        assert!(matches!(err, RepositoryError::DatabaseQueryError(_)));
    }
}

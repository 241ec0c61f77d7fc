// ==========================================
// Accurate 导入服务 - API 调用日志
// ==========================================
// 仅追加, 仅用于展示
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLog {
    pub id: i64,
    pub endpoint: String,
    pub method: String,
    pub status_code: i64,
    pub response_time: i64, // 毫秒
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApiLog {
    pub endpoint: String,
    pub method: String,
    pub status_code: i64,
    pub response_time: i64,
}

impl NewApiLog {
    pub fn new(endpoint: &str, method: &str, status_code: u16, response_time: i64) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            status_code: status_code as i64,
            response_time,
        }
    }
}

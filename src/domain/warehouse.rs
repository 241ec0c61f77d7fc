// ==========================================
// Accurate 导入服务 - 仓库领域模型
// ==========================================
// 对齐: warehouses 表
// accurate_id 可空且不唯一 (同步时先查后插)
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: i64,
    pub accurate_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 新建仓库 (未入库)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWarehouse {
    pub accurate_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

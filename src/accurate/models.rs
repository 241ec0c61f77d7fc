// ==========================================
// Accurate 导入服务 - 远端数据模型
// ==========================================
// 远端 id 可能是数字或字符串, 统一为字符串
// ==========================================

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn remote_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid remote id: {}", other))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteWarehouse {
    #[serde(deserialize_with = "remote_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSalesInvoice {
    #[serde(deserialize_with = "remote_id")]
    pub id: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// save 接口返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRecord {
    #[serde(deserialize_with = "remote_id")]
    pub id: String,
}

/// delete 接口返回 (内容不使用)
pub type DeleteAck = Value;

/// 保存发票所需字段
#[derive(Debug, Clone, PartialEq)]
pub struct SalesInvoiceDraft {
    pub number: String,
    pub customer_name: String,
    pub trans_date: String, // DD/MM/YYYY
    pub amount: f64,
    pub status: String,
}

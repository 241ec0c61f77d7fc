// ==========================================
// Accurate 导入服务 - 响应信封
// ==========================================
// 线上格式: {s, r, e?}
// 对内格式: Envelope<T> { success, result, error }
// 不变量: success 时 result 必有, 失败时 error 必有
// ==========================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const UNKNOWN_ERROR: &str = "Unknown error";

/// 远端原始响应
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEnvelope {
    pub s: bool,
    #[serde(default)]
    pub r: Option<Value>,
    #[serde(default)]
    pub e: Option<Value>,
}

impl RemoteEnvelope {
    /// 转换为类型化信封; s=true 但缺少 r 视为失败
    pub fn decode<T: DeserializeOwned>(self) -> Envelope<T> {
        if !self.s {
            return Envelope::failure(error_text(self.e.as_ref()));
        }
        match self.r {
            Some(value) => match serde_json::from_value::<T>(value) {
                Ok(result) => Envelope::ok(result),
                Err(e) => Envelope::failure(format!("Invalid API response: {}", e)),
            },
            None => Envelope::failure("Invalid API response: missing result".to_string()),
        }
    }
}

/// e 字段可能是字符串或字符串数组
fn error_text(e: Option<&Value>) -> String {
    match e {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Some(Value::Null) | None => UNKNOWN_ERROR.to_string(),
        Some(Value::String(_)) | Some(Value::Array(_)) => UNKNOWN_ERROR.to_string(),
        Some(other) => other.to_string(),
    }
}

// ==========================================
// Envelope<T> - 统一调用结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(self.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string())),
        }
    }

    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or(UNKNOWN_ERROR)
    }
}

// ==========================================
// ConnectionStatus - 连通性检测结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    pub response_time: u64, // 毫秒
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Saved {
        id: i64,
    }

    fn remote(value: Value) -> RemoteEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_success_decodes_result() {
        let envelope: Envelope<Saved> = remote(json!({"s": true, "r": {"id": 42}})).decode();
        assert!(envelope.success);
        assert_eq!(envelope.result, Some(Saved { id: 42 }));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_success_without_result_is_failure() {
        let envelope: Envelope<Saved> = remote(json!({"s": true})).decode();
        assert!(!envelope.success);
        assert!(envelope.result.is_none());
        assert!(envelope.error.is_some());
    }

    #[test]
    fn test_failure_error_text() {
        let envelope: Envelope<Saved> = remote(json!({"s": false, "e": "Name already used"})).decode();
        assert_eq!(envelope.into_result(), Err("Name already used".to_string()));

        let envelope: Envelope<Saved> =
            remote(json!({"s": false, "e": ["first", "second"]})).decode();
        assert_eq!(envelope.error_message(), "first; second");

        let envelope: Envelope<Saved> = remote(json!({"s": false})).decode();
        assert_eq!(envelope.error_message(), "Unknown error");
    }

    #[test]
    fn test_result_shape_mismatch_is_failure() {
        let envelope: Envelope<Saved> = remote(json!({"s": true, "r": "oops"})).decode();
        assert!(!envelope.success);
        assert!(envelope
            .error_message()
            .starts_with("Invalid API response"));
    }

    #[test]
    fn test_connection_status_json() {
        let status = ConnectionStatus {
            connected: false,
            response_time: 12,
            error: Some("down".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({"connected": false, "responseTime": 12, "error": "down"})
        );
    }
}

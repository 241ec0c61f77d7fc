// ==========================================
// Accurate 导入服务 - Accurate API 客户端
// ==========================================
// 职责: 带签名头的 HTTP 调用, 结果统一为 Envelope
// 约定:
// - .do 接口的 save 以 URL 参数提交 (POST)
// - delete 使用 DELETE ?id=
// - 非 2xx / 传输错误 -> 失败信封
// ==========================================

use crate::accurate::envelope::{Envelope, RemoteEnvelope};
use crate::accurate::error::{AccurateError, AccurateResult};
use crate::accurate::gateway::AccurateGateway;
use crate::accurate::models::{
    DeleteAck, RemoteSalesInvoice, RemoteWarehouse, SalesInvoiceDraft, SavedRecord,
};
use crate::accurate::signature::SignedTimestamp;
use crate::config::AccurateSettings;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

pub const HEADER_TIMESTAMP: &str = "X-Api-Timestamp";
pub const HEADER_SIGNATURE: &str = "X-Api-Signature";

const WAREHOUSE_LIST: &str = "/accurate/api/warehouse/list.do";
const WAREHOUSE_SAVE: &str = "/accurate/api/warehouse/save.do";
const WAREHOUSE_DELETE: &str = "/accurate/api/warehouse/delete.do";
const SALES_INVOICE_LIST: &str = "/accurate/api/sales-invoice/list.do";
const SALES_INVOICE_SAVE: &str = "/accurate/api/sales-invoice/save.do";
const SALES_INVOICE_DELETE: &str = "/accurate/api/sales-invoice/delete.do";

pub struct AccurateClient {
    http: reqwest::Client,
    api_host: String,
    api_token: String,
    signature_secret: String,
}

impl AccurateClient {
    pub fn new(settings: &AccurateSettings) -> AccurateResult<Self> {
        let api_host = settings.api_host.trim_end_matches('/').to_string();
        if api_host.is_empty() {
            return Err(AccurateError::Configuration("api_host is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| AccurateError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            api_host,
            api_token: settings.api_token.clone(),
            signature_secret: settings.signature_secret.clone(),
        })
    }

    /// 发送带签名头的请求; 非 2xx 转为错误
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> AccurateResult<reqwest::Response> {
        let url = format!("{}{}", self.api_host, path);
        let signed = SignedTimestamp::at(&self.signature_secret, Utc::now())?;

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&self.api_token)
            .header(HEADER_TIMESTAMP, signed.timestamp.as_str())
            .header(HEADER_SIGNATURE, signed.signature.as_str())
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AccurateError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        Ok(response)
    }

    /// 发送请求并读取原始信封
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> AccurateResult<RemoteEnvelope> {
        let response = self.dispatch(method, path, query).await?;
        Ok(response.json::<RemoteEnvelope>().await?)
    }

    /// 调用并转换为类型化信封
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Envelope<T> {
        let start = Instant::now();
        let method_name = method.to_string();

        match self.send(method, path, query).await {
            Ok(remote) => {
                let envelope = remote.decode::<T>();
                debug!(
                    method = %method_name,
                    path,
                    success = envelope.success,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Accurate API 调用完成"
                );
                envelope
            }
            Err(e) => {
                warn!(
                    method = %method_name,
                    path,
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Accurate API 调用失败"
                );
                Envelope::failure(e.to_string())
            }
        }
    }
}

fn id_query(id: Option<&str>) -> Vec<(&'static str, String)> {
    id.map(|id| vec![("id", id.to_string())]).unwrap_or_default()
}

#[async_trait]
impl AccurateGateway for AccurateClient {
    async fn list_warehouses(&self, id: Option<&str>) -> Envelope<Vec<RemoteWarehouse>> {
        self.call(Method::GET, WAREHOUSE_LIST, &id_query(id)).await
    }

    async fn save_warehouse(&self, name: &str, description: Option<&str>) -> Envelope<SavedRecord> {
        let params = [
            ("name", name.to_string()),
            ("description", description.unwrap_or("").to_string()),
        ];
        self.call(Method::POST, WAREHOUSE_SAVE, &params).await
    }

    async fn delete_warehouse(&self, id: &str) -> Envelope<DeleteAck> {
        self.call(Method::DELETE, WAREHOUSE_DELETE, &[("id", id.to_string())])
            .await
    }

    async fn list_sales_invoices(&self, id: Option<&str>) -> Envelope<Vec<RemoteSalesInvoice>> {
        self.call(Method::GET, SALES_INVOICE_LIST, &id_query(id)).await
    }

    async fn save_sales_invoice(&self, draft: &SalesInvoiceDraft) -> Envelope<SavedRecord> {
        let params = [
            ("number", draft.number.clone()),
            ("customerName", draft.customer_name.clone()),
            ("transDate", draft.trans_date.clone()),
            ("amount", draft.amount.to_string()),
            ("status", draft.status.clone()),
        ];
        self.call(Method::POST, SALES_INVOICE_SAVE, &params).await
    }

    async fn delete_sales_invoice(&self, id: &str) -> Envelope<DeleteAck> {
        self.call(Method::DELETE, SALES_INVOICE_DELETE, &[("id", id.to_string())])
            .await
    }

    // 只看传输层: 2xx 且响应体为 JSON 即可达, 不解码列表内容
    async fn ping(&self) -> Result<(), String> {
        let outcome = match self.dispatch(Method::GET, WAREHOUSE_LIST, &[]).await {
            Ok(response) => response
                .json::<Value>()
                .await
                .map_err(AccurateError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(body) => {
                if body.get("s").and_then(Value::as_bool) == Some(false) {
                    warn!(path = WAREHOUSE_LIST, "Accurate API 可达, 但返回失败信封");
                }
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_host() {
        let settings = AccurateSettings {
            api_host: "/".to_string(),
            ..AccurateSettings::default()
        };
        assert!(matches!(
            AccurateClient::new(&settings),
            Err(AccurateError::Configuration(_))
        ));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let settings = AccurateSettings {
            api_host: "http://localhost:9000/".to_string(),
            ..AccurateSettings::default()
        };
        let client = AccurateClient::new(&settings).unwrap();
        assert_eq!(client.api_host, "http://localhost:9000");
    }

    #[test]
    fn test_id_query() {
        assert!(id_query(None).is_empty());
        assert_eq!(id_query(Some("7")), vec![("id", "7".to_string())]);
    }
}

// ==========================================
// Accurate 导入服务 - 远端网关 Trait
// ==========================================
// 实现者: AccurateClient (reqwest), 测试替身
// 红线: 所有方法返回信封, 不抛错、不 panic
// ==========================================

use crate::accurate::envelope::{ConnectionStatus, Envelope};
use crate::accurate::models::{
    DeleteAck, RemoteSalesInvoice, RemoteWarehouse, SalesInvoiceDraft, SavedRecord,
};
use async_trait::async_trait;
use std::time::Instant;

#[async_trait]
pub trait AccurateGateway: Send + Sync {
    // ===== 仓库 =====
    async fn list_warehouses(&self, id: Option<&str>) -> Envelope<Vec<RemoteWarehouse>>;

    async fn save_warehouse(&self, name: &str, description: Option<&str>) -> Envelope<SavedRecord>;

    async fn delete_warehouse(&self, id: &str) -> Envelope<DeleteAck>;

    // ===== 销售发票 =====
    async fn list_sales_invoices(&self, id: Option<&str>) -> Envelope<Vec<RemoteSalesInvoice>>;

    async fn save_sales_invoice(&self, draft: &SalesInvoiceDraft) -> Envelope<SavedRecord>;

    async fn delete_sales_invoice(&self, id: &str) -> Envelope<DeleteAck>;

    // ===== 连通性 =====
    /// 轻量列表调用是否可达
    ///
    /// 传输错误与非 2xx 返回 Err; 远端业务失败 (s=false) 仍算可达
    async fn ping(&self) -> Result<(), String>;

    /// 连通性检测: 对 ping 计时, 结果从不抛错
    async fn test_connection(&self) -> ConnectionStatus {
        let start = Instant::now();
        let outcome = self.ping().await;
        let response_time = start.elapsed().as_millis() as u64;

        ConnectionStatus {
            connected: outcome.is_ok(),
            response_time,
            error: outcome.err(),
        }
    }
}

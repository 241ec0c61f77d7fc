// ==========================================
// Accurate 导入服务 - 远端同步客户端
// ==========================================
// 职责: Accurate 会计 API 的类型化调用封装
// 红线: 调用结果一律为 Envelope, 错误不外溢
// ==========================================

pub mod client;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod models;
pub mod signature;

pub use client::AccurateClient;
pub use envelope::{ConnectionStatus, Envelope, RemoteEnvelope};
pub use error::{AccurateError, AccurateResult};
pub use gateway::AccurateGateway;
pub use models::{RemoteSalesInvoice, RemoteWarehouse, SalesInvoiceDraft, SavedRecord};

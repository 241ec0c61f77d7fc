// ==========================================
// Accurate 导入服务 - 领域类型定义
// ==========================================
// 职责: 导入类型 / 导入任务状态 及其状态机
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 导入类型 (Import Type)
// ==========================================
// 序列化格式: kebab-case (与前端及数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportType {
    Warehouse,    // 仓库
    SalesInvoice, // 销售发票
}

impl ImportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportType::Warehouse => "warehouse",
            ImportType::SalesInvoice => "sales-invoice",
        }
    }

    /// 模板下载文件名
    pub fn template_file_name(&self) -> &'static str {
        match self {
            ImportType::Warehouse => "warehouse_template.xlsx",
            ImportType::SalesInvoice => "sales_invoice_template.xlsx",
        }
    }
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "warehouse" => Ok(ImportType::Warehouse),
            "sales-invoice" => Ok(ImportType::SalesInvoice),
            other => Err(format!("Invalid import type: {}", other)),
        }
    }
}

// ==========================================
// 导入任务状态 (Import Status)
// ==========================================
// 状态机: pending -> processing -> completed | failed
// 额外允许: pending -> failed (排队中取消)
// 终态吸收,不允许回退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Pending,    // 已排队
    Processing, // 处理中
    Completed,  // 已完成
    Failed,     // 失败
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Pending => "pending",
            ImportStatus::Processing => "processing",
            ImportStatus::Completed => "completed",
            ImportStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStatus::Completed | ImportStatus::Failed)
    }

    /// 判断状态转换是否合法
    pub fn can_transition_to(&self, next: ImportStatus) -> bool {
        matches!(
            (self, next),
            (ImportStatus::Pending, ImportStatus::Processing)
                | (ImportStatus::Pending, ImportStatus::Failed)
                | (ImportStatus::Processing, ImportStatus::Completed)
                | (ImportStatus::Processing, ImportStatus::Failed)
        )
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ImportStatus::Pending),
            "processing" => Ok(ImportStatus::Processing),
            "completed" => Ok(ImportStatus::Completed),
            "failed" => Ok(ImportStatus::Failed),
            other => Err(format!("未知的导入状态: {}", other)),
        }
    }
}

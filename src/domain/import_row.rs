// ==========================================
// Accurate 导入服务 - 导入行模型
// ==========================================
// 职责: 表格解析后的类型化行 / 校验结果
// 说明: 行字段保留原始文本, 数值与日期在校验阶段判定
// ==========================================

use crate::domain::types::ImportType;
use serde::{Deserialize, Serialize};

/// 销售发票未填写状态时的默认值
pub const DEFAULT_INVOICE_STATUS: &str = "pending";

// ==========================================
// WarehouseRow - 仓库导入行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseRow {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ==========================================
// SalesInvoiceRow - 销售发票导入行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesInvoiceRow {
    pub invoice_number: String,
    pub customer_name: String,
    pub amount: String, // 原始文本
    pub date: String,   // 原始文本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SalesInvoiceRow {
    /// 解析金额; 非数字或非有限值返回 None
    pub fn amount_value(&self) -> Option<f64> {
        let cleaned = self.amount.trim().replace(',', "");
        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn status_or_default(&self) -> &str {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_INVOICE_STATUS)
    }
}

// ==========================================
// ImportRows - 按导入类型区分的行集合
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportRows {
    Warehouses(Vec<WarehouseRow>),
    SalesInvoices(Vec<SalesInvoiceRow>),
}

impl ImportRows {
    pub fn import_type(&self) -> ImportType {
        match self {
            ImportRows::Warehouses(_) => ImportType::Warehouse,
            ImportRows::SalesInvoices(_) => ImportType::SalesInvoice,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ImportRows::Warehouses(rows) => rows.len(),
            ImportRows::SalesInvoices(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 预览: 前 n 行
    pub fn preview(&self, n: usize) -> ImportRows {
        match self {
            ImportRows::Warehouses(rows) => {
                ImportRows::Warehouses(rows.iter().take(n).cloned().collect())
            }
            ImportRows::SalesInvoices(rows) => {
                ImportRows::SalesInvoices(rows.iter().take(n).cloned().collect())
            }
        }
    }
}

// ==========================================
// ParsedSheet - 解析结果
// ==========================================
// skipped_rows: 因主标识字段为空而被丢弃的行数
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet {
    pub rows: ImportRows,
    pub skipped_rows: usize,
}

// ==========================================
// ValidationResult - 校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

// ==========================================
// Accurate 导入服务 - 字段映射器实现
// ==========================================
// 职责: 原始表头 -> 标准字段 (大小写不敏感 + 别名)
// 阶段 1: 原始行 -> 类型化导入行, 并丢弃主标识为空的行
// ==========================================

use crate::domain::import_row::{ImportRows, ParsedSheet, SalesInvoiceRow, WarehouseRow};
use crate::domain::types::ImportType;
use crate::importer::import_trait::FieldMapper as FieldMapperTrait;
use std::collections::HashMap;

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_to_warehouse(&self, row: &HashMap<String, String>) -> WarehouseRow {
        let row = normalize_row(row);
        WarehouseRow {
            name: self.get_string(&row, "name").unwrap_or_default(),
            description: self.get_string(&row, "description"),
        }
    }

    fn map_to_sales_invoice(&self, row: &HashMap<String, String>) -> SalesInvoiceRow {
        let row = normalize_row(row);
        SalesInvoiceRow {
            invoice_number: self.get_string(&row, "invoicenumber").unwrap_or_default(),
            customer_name: self.get_string(&row, "customername").unwrap_or_default(),
            amount: self.get_string(&row, "amount").unwrap_or_default(),
            date: self.get_string(&row, "date").unwrap_or_default(),
            status: self.get_string(&row, "status"),
        }
    }
}

impl FieldMapper {
    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            "name" => &["name", "warehousename", "warehouse"],
            "description" => &["description", "desc", "notes"],
            "invoicenumber" => &["invoicenumber", "invoiceno", "invoice", "number"],
            "customername" => &["customername", "customer"],
            "amount" => &["amount", "total", "totalamount"],
            "date" => &["date", "invoicedate", "transdate"],
            _ => &[],
        };

        std::iter::once(key)
            .chain(aliases.iter().copied())
            .filter_map(|alias| row.get(alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// 原始行 -> 解析结果
    ///
    /// 主标识字段 (仓库 name / 发票 invoiceNumber) 为空的行被丢弃, 只计数不报错
    pub fn map_sheet(
        &self,
        import_type: ImportType,
        records: &[HashMap<String, String>],
    ) -> ParsedSheet {
        let (rows, skipped_rows) = match import_type {
            ImportType::Warehouse => {
                let mapped: Vec<WarehouseRow> =
                    records.iter().map(|r| self.map_to_warehouse(r)).collect();
                let total = mapped.len();
                let kept: Vec<WarehouseRow> = mapped
                    .into_iter()
                    .filter(|r| !r.name.trim().is_empty())
                    .collect();
                let skipped = total - kept.len();
                (ImportRows::Warehouses(kept), skipped)
            }
            ImportType::SalesInvoice => {
                let mapped: Vec<SalesInvoiceRow> = records
                    .iter()
                    .map(|r| self.map_to_sales_invoice(r))
                    .collect();
                let total = mapped.len();
                let kept: Vec<SalesInvoiceRow> = mapped
                    .into_iter()
                    .filter(|r| !r.invoice_number.trim().is_empty())
                    .collect();
                let skipped = total - kept.len();
                (ImportRows::SalesInvoices(kept), skipped)
            }
        };

        if skipped_rows > 0 {
            tracing::warn!(
                import_type = %import_type,
                skipped_rows,
                "主标识字段为空, 已跳过对应行"
            );
        }

        ParsedSheet { rows, skipped_rows }
    }
}

/// 表头归一化: 小写, 去掉空白 / 下划线 / 连字符
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn normalize_row(row: &HashMap<String, String>) -> HashMap<String, String> {
    row.iter()
        .map(|(k, v)| (normalize_header(k), v.clone()))
        .collect()
}

// ==========================================
// Accurate 导入服务 - 导入阶段 Trait
// ==========================================
// 职责: 定义 解析 / 映射 / 校验 三个阶段的接口（不包含实现）
// ==========================================

use crate::domain::import_row::{ImportRows, SalesInvoiceRow, ValidationResult, WarehouseRow};
use crate::importer::error::ImportResult;
use std::collections::HashMap;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件字节 -> 原始行 (表头 -> 单元格文本)
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析上传文件的第一个工作表
    ///
    /// # 返回
    /// - Ok(records): 每行一个 map, 已跳过完全空白的行
    /// - Err: 文件无法识别或损坏
    fn parse_to_raw_records(&self, bytes: &[u8]) -> ImportResult<Vec<HashMap<String, String>>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 原始行 -> 类型化导入行 (按表头名称匹配)
pub trait FieldMapper: Send + Sync {
    fn map_to_warehouse(&self, row: &HashMap<String, String>) -> WarehouseRow;

    fn map_to_sales_invoice(&self, row: &HashMap<String, String>) -> SalesInvoiceRow;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 静态字段规则校验, 纯函数, 不抛错
// 单行检查供任务流水线复用, 整表校验在其上默认实现
pub trait RowValidator: Send + Sync {
    /// 单行仓库规则; `line` 为表格行号 (含表头)
    fn check_warehouse(&self, row: &WarehouseRow, line: usize) -> Vec<String>;

    fn check_sales_invoice(&self, row: &SalesInvoiceRow, line: usize) -> Vec<String>;

    fn validate_warehouses(&self, rows: &[WarehouseRow]) -> ValidationResult {
        let errors = rows
            .iter()
            .enumerate()
            .flat_map(|(index, row)| self.check_warehouse(row, row_line(index)))
            .collect();
        ValidationResult::from_errors(errors)
    }

    fn validate_sales_invoices(&self, rows: &[SalesInvoiceRow]) -> ValidationResult {
        let errors = rows
            .iter()
            .enumerate()
            .flat_map(|(index, row)| self.check_sales_invoice(row, row_line(index)))
            .collect();
        ValidationResult::from_errors(errors)
    }

    /// 按行集合类型分派
    fn validate(&self, rows: &ImportRows) -> ValidationResult {
        match rows {
            ImportRows::Warehouses(rows) => self.validate_warehouses(rows),
            ImportRows::SalesInvoices(rows) => self.validate_sales_invoices(rows),
        }
    }
}

/// 行下标 -> 表格行号 (第 1 行为表头)
pub fn row_line(index: usize) -> usize {
    index + 2
}

// ==========================================
// Accurate 导入服务 - 行校验器实现
// ==========================================
// 职责: 静态字段规则, 错误信息以 "Row {n}:" 开头 (n = 下标 + 2, 含表头行)
// ==========================================

use crate::domain::import_row::{SalesInvoiceRow, WarehouseRow};
use crate::importer::import_trait::RowValidator as RowValidatorTrait;
use chrono::{DateTime, NaiveDate};

/// 仓库名称最大长度
pub const MAX_NAME_LEN: usize = 100;
/// 仓库描述最大长度
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// 可接受的日期格式 (另接受 RFC 3339)
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

pub struct RowValidator {
    max_name_len: usize,
    max_description_len: usize,
}

impl RowValidator {
    pub fn new(max_name_len: usize, max_description_len: usize) -> Self {
        Self {
            max_name_len,
            max_description_len,
        }
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new(MAX_NAME_LEN, MAX_DESCRIPTION_LEN)
    }
}

impl RowValidatorTrait for RowValidator {
    fn check_warehouse(&self, row: &WarehouseRow, line: usize) -> Vec<String> {
        let mut errors = Vec::new();

        if row.name.trim().is_empty() {
            errors.push(format!("Row {}: Name is required", line));
        }
        if row.name.chars().count() > self.max_name_len {
            errors.push(format!("Row {}: Name must be less than 100 characters", line));
        }
        if let Some(description) = &row.description {
            if description.chars().count() > self.max_description_len {
                errors.push(format!(
                    "Row {}: Description must be less than 500 characters",
                    line
                ));
            }
        }
        errors
    }

    fn check_sales_invoice(&self, row: &SalesInvoiceRow, line: usize) -> Vec<String> {
        let mut errors = Vec::new();

        if row.invoice_number.trim().is_empty() {
            errors.push(format!("Row {}: Invoice number is required", line));
        }
        if row.customer_name.trim().is_empty() {
            errors.push(format!("Row {}: Customer name is required", line));
        }
        // 金额为 0 同样视为无效
        match row.amount_value() {
            Some(amount) if amount != 0.0 => {}
            _ => errors.push(format!("Row {}: Amount must be a valid number", line)),
        }
        if row.date.trim().is_empty() {
            errors.push(format!("Row {}: Date is required", line));
        } else if parse_date(&row.date).is_none() {
            errors.push(format!(
                "Row {}: Date must be in valid format (YYYY-MM-DD)",
                line
            ));
        }
        errors
    }
}

/// 解析日期文本
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::import_row::ImportRows;

    fn warehouse(name: &str, description: Option<&str>) -> WarehouseRow {
        WarehouseRow {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    fn invoice(number: &str, customer: &str, amount: &str, date: &str) -> SalesInvoiceRow {
        SalesInvoiceRow {
            invoice_number: number.to_string(),
            customer_name: customer.to_string(),
            amount: amount.to_string(),
            date: date.to_string(),
            status: Some("paid".to_string()),
        }
    }

    #[test]
    fn test_valid_warehouses() {
        let validator = RowValidator::default();
        let result = validator.validate_warehouses(&[
            warehouse("Example Warehouse 1", Some("Main warehouse for electronics")),
            warehouse("Example Warehouse 2", None),
        ]);
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_warehouse_length_limits() {
        let validator = RowValidator::default();
        let long_name = "n".repeat(101);
        let long_desc = "d".repeat(501);
        let result = validator.validate_warehouses(&[
            warehouse(&"n".repeat(100), Some(&"d".repeat(500))),
            warehouse(&long_name, Some(&long_desc)),
        ]);

        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "Row 3: Name must be less than 100 characters",
                "Row 3: Description must be less than 500 characters",
            ]
        );
    }

    #[test]
    fn test_missing_single_invoice_field() {
        let validator = RowValidator::default();
        let result = validator.validate_sales_invoices(&[invoice("INV-1", "", "100", "2024-01-15")]);
        assert_eq!(result.errors, vec!["Row 2: Customer name is required"]);
    }

    #[test]
    fn test_invoice_amount_rules() {
        let validator = RowValidator::default();
        let result = validator.validate_sales_invoices(&[
            invoice("A", "C", "abc", "2024-01-15"),
            invoice("B", "C", "0", "2024-01-15"),
            invoice("C", "C", "", "2024-01-15"),
            invoice("D", "C", "12.5", "2024-01-15"),
        ]);
        assert_eq!(
            result.errors,
            vec![
                "Row 2: Amount must be a valid number",
                "Row 3: Amount must be a valid number",
                "Row 4: Amount must be a valid number",
            ]
        );
    }

    #[test]
    fn test_invoice_date_rules() {
        let validator = RowValidator::default();
        let result = validator.validate_sales_invoices(&[
            invoice("A", "C", "1", ""),
            invoice("B", "C", "1", "not-a-date"),
            invoice("C", "C", "1", "2024/01/15"),
            invoice("D", "C", "1", "15/01/2024"),
            invoice("E", "C", "1", "2024-01-15T10:00:00+07:00"),
        ]);
        assert_eq!(
            result.errors,
            vec![
                "Row 2: Date is required",
                "Row 3: Date must be in valid format (YYYY-MM-DD)",
            ]
        );
    }

    #[test]
    fn test_single_row_check_uses_given_line() {
        let validator = RowValidator::default();
        let errors = validator.check_sales_invoice(&invoice("A", "C", "abc", "2024-01-15"), 7);
        assert_eq!(errors, vec!["Row 7: Amount must be a valid number"]);
        assert!(validator
            .check_warehouse(&warehouse("Main", None), 2)
            .is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let validator = RowValidator::default();
        let rows = ImportRows::SalesInvoices(vec![
            invoice("", "", "x", "bad"),
            invoice("INV-2", "C", "10", "2024-02-30"),
        ]);
        let first = validator.validate(&rows);
        let second = validator.validate(&rows);
        assert_eq!(first, second);
        assert_eq!(first.errors.len(), 5);
    }
}

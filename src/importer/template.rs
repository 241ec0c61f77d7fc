// ==========================================
// Accurate 导入服务 - 导入模板生成
// ==========================================
// 职责: 为每种导入类型生成带示例数据的 xlsx 模板
// 约束: 解析生成的模板必须得到与示例数据相同的行
// ==========================================

use crate::domain::import_row::{SalesInvoiceRow, WarehouseRow};
use crate::domain::types::ImportType;
use crate::importer::error::ImportResult;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

const WAREHOUSE_SHEET: &str = "Warehouses";
const SALES_INVOICE_SHEET: &str = "Sales Invoices";

const WAREHOUSE_HEADER_FILL: u32 = 0xE3F2FD;
const SALES_INVOICE_HEADER_FILL: u32 = 0xE8F5E8;

/// 仓库模板示例行
pub fn warehouse_examples() -> Vec<WarehouseRow> {
    vec![
        WarehouseRow {
            name: "Example Warehouse 1".to_string(),
            description: Some("Main warehouse for electronics".to_string()),
        },
        WarehouseRow {
            name: "Example Warehouse 2".to_string(),
            description: Some("Secondary warehouse for accessories".to_string()),
        },
    ]
}

/// 销售发票模板示例行
pub fn sales_invoice_examples() -> Vec<SalesInvoiceRow> {
    vec![
        SalesInvoiceRow {
            invoice_number: "INV-2024-001".to_string(),
            customer_name: "Customer ABC".to_string(),
            amount: "1500000".to_string(),
            date: "2024-01-15".to_string(),
            status: Some("paid".to_string()),
        },
        SalesInvoiceRow {
            invoice_number: "INV-2024-002".to_string(),
            customer_name: "Customer XYZ".to_string(),
            amount: "2750000".to_string(),
            date: "2024-01-16".to_string(),
            status: Some("pending".to_string()),
        },
    ]
}

pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn generate(&self, import_type: ImportType) -> ImportResult<Vec<u8>> {
        match import_type {
            ImportType::Warehouse => self.warehouse_template(),
            ImportType::SalesInvoice => self.sales_invoice_template(),
        }
    }

    fn header_format(fill: u32) -> Format {
        Format::new()
            .set_bold()
            .set_background_color(Color::RGB(fill))
            .set_border_bottom(FormatBorder::Thin)
    }

    fn warehouse_template(&self) -> ImportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(WAREHOUSE_SHEET)?;

            let header = Self::header_format(WAREHOUSE_HEADER_FILL);
            sheet.write_string_with_format(0, 0, "name", &header)?;
            sheet.write_string_with_format(0, 1, "description", &header)?;
            sheet.set_column_width(0, 30)?;
            sheet.set_column_width(1, 50)?;

            for (i, row) in warehouse_examples().iter().enumerate() {
                let r = (i + 1) as u32;
                sheet.write_string(r, 0, &row.name)?;
                if let Some(description) = &row.description {
                    sheet.write_string(r, 1, description)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    fn sales_invoice_template(&self) -> ImportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(SALES_INVOICE_SHEET)?;

            let header = Self::header_format(SALES_INVOICE_HEADER_FILL);
            let columns: [(&str, f64); 5] = [
                ("invoiceNumber", 15.0),
                ("customerName", 25.0),
                ("amount", 15.0),
                ("date", 12.0),
                ("status", 12.0),
            ];
            for (col, (title, width)) in columns.iter().enumerate() {
                sheet.write_string_with_format(0, col as u16, *title, &header)?;
                sheet.set_column_width(col as u16, *width)?;
            }

            for (i, row) in sales_invoice_examples().iter().enumerate() {
                let r = (i + 1) as u32;
                sheet.write_string(r, 0, &row.invoice_number)?;
                sheet.write_string(r, 1, &row.customer_name)?;
                // 金额写为数值单元格
                match row.amount_value() {
                    Some(amount) => sheet.write_number(r, 2, amount)?,
                    None => sheet.write_string(r, 2, &row.amount)?,
                };
                sheet.write_string(r, 3, &row.date)?;
                sheet.write_string(r, 4, row.status_or_default())?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_auto_from_rs, Reader};
    use std::io::Cursor;

    fn sheet_names(bytes: Vec<u8>) -> Vec<String> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
        workbook.sheet_names()
    }

    #[test]
    fn test_sheet_names() {
        let generator = TemplateGenerator;
        assert_eq!(
            sheet_names(generator.generate(ImportType::Warehouse).unwrap()),
            vec![WAREHOUSE_SHEET]
        );
        assert_eq!(
            sheet_names(generator.generate(ImportType::SalesInvoice).unwrap()),
            vec![SALES_INVOICE_SHEET]
        );
    }

    #[test]
    fn test_template_is_xlsx_zip() {
        let bytes = TemplateGenerator.generate(ImportType::Warehouse).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}

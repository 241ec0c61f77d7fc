// ==========================================
// Accurate 导入服务 - 文件解析器实现
// ==========================================
// 阶段 0: 上传字节 -> 原始行
// 支持: Excel (.xlsx/.xls/.xlsb/.ods) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, bytes: &[u8]) -> ImportResult<Vec<HashMap<String, String>>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 格式由 calamine 自动识别, 只读第一个工作表
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, bytes: &[u8]) -> ImportResult<Vec<HashMap<String, String>>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no worksheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）; 空表视为无数据
        let mut rows = range.rows();
        let header_row = match rows.next() {
            Some(row) => row,
            None => return Ok(Vec::new()),
        };

        let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();

        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if header.is_empty() {
                        continue;
                    }
                    row_map.insert(header.clone(), cell_to_string(cell));
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

/// 单元格 -> 文本
///
/// - 字符串去首尾空白
/// - 整数值浮点数不带小数部分 (1500000.0 -> "1500000")
/// - 日期单元格输出 YYYY-MM-DD
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::DateTimeIso(s) => s.get(..10).unwrap_or(s).to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse(&self, file_name: &str, bytes: &[u8]) -> ImportResult<Vec<HashMap<String, String>>> {
        if bytes.is_empty() {
            return Err(ImportError::EmptyFile(file_name.to_string()));
        }

        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(bytes),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => ExcelParser.parse_to_raw_records(bytes),
            _ => Err(ImportError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let data = "name,description\nMain,First\n,\nSecond, padded \n";
        let records = CsvParser.parse_to_raw_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Some(&"Main".to_string()));
        assert_eq!(records[1].get("description"), Some(&"padded".to_string()));
    }

    #[test]
    fn test_csv_parser_strips_bom() {
        let data = "\u{feff}name\nA\n";
        let records = CsvParser.parse_to_raw_records(data.as_bytes()).unwrap();
        assert_eq!(records[0].get("name"), Some(&"A".to_string()));
    }

    #[test]
    fn test_excel_parser_reads_first_sheet() {
        let bytes = workbook_bytes(&[&["name", "description"], &["W1", "D1"], &["", ""], &["W2", ""]]);
        let records = ExcelParser.parse_to_raw_records(&bytes).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Some(&"W1".to_string()));
        assert_eq!(records[1].get("name"), Some(&"W2".to_string()));
    }

    #[test]
    fn test_excel_numeric_and_date_cells() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let date = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        sheet.write_string(0, 0, "amount").unwrap();
        sheet.write_string(0, 1, "date").unwrap();
        sheet.write_number(1, 0, 1500000.0).unwrap();
        sheet.write_datetime_with_format(1, 1, &date, &date_format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let records = ExcelParser.parse_to_raw_records(&bytes).unwrap();
        assert_eq!(records[0].get("amount"), Some(&"1500000".to_string()));
        assert_eq!(records[0].get("date"), Some(&"2024-01-15".to_string()));
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2750000.0), "2750000");
        assert_eq!(format_float(12.5), "12.5");
    }

    #[test]
    fn test_universal_parser_dispatch() {
        let parser = UniversalFileParser;
        let csv = parser.parse("data.CSV", b"name\nA\n").unwrap();
        assert_eq!(csv.len(), 1);

        let err = parser.parse("data.txt", b"name\nA\n").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));

        let err = parser.parse("data.xlsx", b"").unwrap_err();
        assert!(matches!(err, ImportError::EmptyFile(_)));

        let err = parser.parse("data.xlsx", b"not a workbook").unwrap_err();
        assert!(matches!(err, ImportError::ExcelParseError(_)));
    }
}

// ==========================================
// Accurate 导入服务 - 导入层
// ==========================================
// 职责: 模板生成 / 表格解析 / 行校验
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_trait;
pub mod row_validator;
pub mod sheet_importer;
pub mod template;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use row_validator::RowValidator as RowValidatorImpl;
pub use sheet_importer::SheetImporter;
pub use template::{sales_invoice_examples, warehouse_examples, TemplateGenerator};

// 重导出 Trait 接口
pub use import_trait::{FieldMapper, FileParser, RowValidator};

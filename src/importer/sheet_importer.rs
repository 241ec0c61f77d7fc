// ==========================================
// Accurate 导入服务 - 表格导入门面
// ==========================================
// 职责: 串联 解析 -> 映射 -> 校验, 供服务层与任务流水线调用
// ==========================================

use crate::domain::import_row::{ImportRows, ParsedSheet, ValidationResult};
use crate::domain::types::ImportType;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::import_trait::RowValidator as RowValidatorTrait;
use crate::importer::row_validator::RowValidator;
use crate::importer::template::TemplateGenerator;
use tracing::debug;

pub struct SheetImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
    validator: Box<dyn RowValidatorTrait>,
    templates: TemplateGenerator,
}

impl Default for SheetImporter {
    fn default() -> Self {
        Self::new(Box::new(RowValidator::default()))
    }
}

impl SheetImporter {
    pub fn new(validator: Box<dyn RowValidatorTrait>) -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper,
            validator,
            templates: TemplateGenerator,
        }
    }

    /// 解析上传文件为类型化行
    pub fn parse(
        &self,
        import_type: ImportType,
        file_name: &str,
        bytes: &[u8],
    ) -> ImportResult<ParsedSheet> {
        let records = self.parser.parse(file_name, bytes)?;
        debug!(file_name, raw_rows = records.len(), "文件解析完成");

        let sheet = self.mapper.map_sheet(import_type, &records);
        debug!(
            file_name,
            rows = sheet.rows.len(),
            skipped_rows = sheet.skipped_rows,
            "字段映射完成"
        );
        Ok(sheet)
    }

    pub fn validate(&self, rows: &ImportRows) -> ValidationResult {
        self.validator.validate(rows)
    }

    /// 单行规则, 任务流水线逐行调用
    pub fn validator(&self) -> &dyn RowValidatorTrait {
        self.validator.as_ref()
    }

    pub fn generate_template(&self, import_type: ImportType) -> ImportResult<Vec<u8>> {
        self.templates.generate(import_type)
    }
}

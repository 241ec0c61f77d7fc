// ==========================================
// Accurate 导入服务 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 错误信息会作为任务失败原因展示给操作员, 使用英文
// ==========================================

use thiserror::Error;

/// 解析 / 校验前置阶段 / 模板生成的失败
///
/// 行级校验问题不走这里, 见 `ValidationResult`
#[derive(Error, Debug)]
pub enum ImportError {
    /// 扩展名不在 xlsx/xls/ods/csv 之列
    #[error("Unsupported file format: {0} (expected .xlsx/.xls/.ods/.csv)")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    FileReadError(String),

    #[error("Failed to parse Excel file: {0}")]
    ExcelParseError(String),

    #[error("Failed to parse CSV file: {0}")]
    CsvParseError(String),

    /// 缺少工作表或表头行
    #[error("File contains no data: {0}")]
    EmptyFile(String),

    #[error("Failed to generate template: {0}")]
    TemplateError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::FileReadError(err.to_string())
    }
}

// 底层库错误只保留文本, 任务记录里存的就是这段消息
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        Self::ExcelParseError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::CsvParseError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::TemplateError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

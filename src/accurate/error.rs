// ==========================================
// Accurate 导入服务 - 远端客户端错误类型
// ==========================================
// 说明: 仅在客户端内部使用, 对外统一转换为失败信封
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccurateError {
    #[error("API request failed: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("API request error: {0}")]
    Transport(String),

    #[error("Invalid API response: {0}")]
    Decode(String),

    #[error("Signature generation failed: {0}")]
    Signature(String),

    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for AccurateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AccurateError::Decode(err.to_string())
        } else {
            AccurateError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AccurateError {
    fn from(err: serde_json::Error) -> Self {
        AccurateError::Decode(err.to_string())
    }
}

pub type AccurateResult<T> = Result<T, AccurateError>;

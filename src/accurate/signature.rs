// ==========================================
// Accurate 导入服务 - 请求签名
// ==========================================
// 时间戳: DD/MM/YYYY HH:MM:SS, 固定 UTC+7 (雅加达)
// 签名: base64(HMAC-SHA256(secret, timestamp))
// ==========================================

use crate::accurate::error::{AccurateError, AccurateResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const JAKARTA_OFFSET_HOURS: i64 = 7;
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// UTC 时间 -> 雅加达时间戳文本
pub fn jakarta_timestamp(now: DateTime<Utc>) -> String {
    (now.naive_utc() + Duration::hours(JAKARTA_OFFSET_HOURS))
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

pub fn sign(secret: &str, timestamp: &str) -> AccurateResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AccurateError::Signature(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// 一次请求使用的时间戳与签名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTimestamp {
    pub timestamp: String,
    pub signature: String,
}

impl SignedTimestamp {
    pub fn at(secret: &str, now: DateTime<Utc>) -> AccurateResult<Self> {
        let timestamp = jakarta_timestamp(now);
        let signature = sign(secret, &timestamp)?;
        Ok(Self {
            timestamp,
            signature,
        })
    }
}

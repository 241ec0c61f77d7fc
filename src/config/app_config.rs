// ==========================================
// Accurate 导入服务 - 应用配置
// ==========================================
// 加载顺序 (后者覆盖前者):
// 1. 默认值
// 2. accurate-import.toml (可选)
// 3. 环境变量 ACCURATE_IMPORT__* (分隔符 "__")
// 4. 兼容变量 ACCURATE_API_HOST / ACCURATE_API_TOKEN / ACCURATE_SIGNATURE_SECRET
// ==========================================

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// 配置文件名 (不含扩展名)
pub const CONFIG_FILE_NAME: &str = "accurate-import";
/// 环境变量前缀
pub const ENV_PREFIX: &str = "ACCURATE_IMPORT";

pub const ENV_API_HOST: &str = "ACCURATE_API_HOST";
pub const ENV_API_TOKEN: &str = "ACCURATE_API_TOKEN";
pub const ENV_SIGNATURE_SECRET: &str = "ACCURATE_SIGNATURE_SECRET";

// ==========================================
// AccurateSettings - 远端 API 连接配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccurateSettings {
    #[serde(default = "default_api_host")]
    pub api_host: String,

    #[serde(default)]
    pub api_token: String,

    #[serde(default)]
    pub signature_secret: String,

    /// 单次请求超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AccurateSettings {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
            api_token: String::new(),
            signature_secret: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AccurateSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ==========================================
// AppConfig - 服务配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite 路径, 默认内存库
    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default)]
    pub accurate: AccurateSettings,

    /// 上传文件大小上限（MB）
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,

    /// 单个任务保留的错误条数上限
    #[serde(default = "default_max_job_errors")]
    pub max_job_errors: usize,

    /// 导入队列容量
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// 日志输出为 JSON
    #[serde(default)]
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            database_path: default_database_path(),
            accurate: AccurateSettings::default(),
            max_upload_mb: default_max_upload_mb(),
            max_job_errors: default_max_job_errors(),
            queue_capacity: default_queue_capacity(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// 从配置文件与环境变量加载
    pub fn load() -> anyhow::Result<Self> {
        // .env 不存在时忽略
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.apply_legacy_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 兼容变量覆盖 (空值忽略)
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty(ENV_API_HOST) {
            self.accurate.api_host = host;
        }
        if let Some(token) = non_empty(ENV_API_TOKEN) {
            self.accurate.api_token = token;
        }
        if let Some(secret) = non_empty(ENV_SIGNATURE_SECRET) {
            self.accurate.signature_secret = secret;
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_database_path() -> String {
    crate::db::IN_MEMORY_PATH.to_string()
}

fn default_api_host() -> String {
    "https://zeus.accurate.id".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_upload_mb() -> usize {
    10
}

fn default_max_job_errors() -> usize {
    500
}

fn default_queue_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.database_path, ":memory:");
        assert_eq!(cfg.accurate.api_host, "https://zeus.accurate.id");
        assert_eq!(cfg.accurate.request_timeout_secs, 30);
        assert_eq!(cfg.max_upload_mb, 10);
        assert_eq!(cfg.max_job_errors, 500);
        assert_eq!(cfg.queue_capacity, 64);
        assert!(!cfg.log_json);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "port = 8081\n[accurate]\napi_token = \"tok\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.accurate.api_token, "tok");
        assert_eq!(cfg.accurate.api_host, "https://zeus.accurate.id");
        assert_eq!(cfg.max_job_errors, 500);
    }

    #[test]
    fn test_legacy_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_HOST, "http://localhost:9000"),
            (ENV_API_TOKEN, "token-1"),
            (ENV_SIGNATURE_SECRET, ""),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        cfg.accurate.signature_secret = "keep".to_string();
        cfg.apply_legacy_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.accurate.api_host, "http://localhost:9000");
        assert_eq!(cfg.accurate.api_token, "token-1");
        assert_eq!(cfg.accurate.signature_secret, "keep");
    }

    #[test]
    fn test_socket_addr_and_limits() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.socket_addr().unwrap().port(), 5000);
        assert_eq!(cfg.max_upload_bytes(), 10 * 1024 * 1024);
    }
}

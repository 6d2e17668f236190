use serde::{Deserialize, Serialize};
use shared::error::AppError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default JSONBin v3 bins endpoint
pub const DEFAULT_JSONBIN_BASE_URL: &str = "https://api.jsonbin.io/v3/b";

/// Values shipped in config templates; treated as "not configured"
const PLACEHOLDERS: [&str; 6] = [
    "YOUR_JSONBIN_API_KEY_HERE",
    "YOUR_JSONBIN_BIN_ID_HERE",
    "YOUR_JSONBIN_API_KEY",
    "YOUR_BIN_ID",
    "YOUR_ACTUAL_API_KEY_HERE",
    "YOUR_ACTUAL_BIN_ID_HERE",
];

/// 节点配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、会话、日志) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 设置后按天滚动写日志文件 |
/// | JSONBIN_API_KEY | - | 远程 bin 的 master key |
/// | JSONBIN_BIN_ID | - | 远程 bin id |
/// | JSONBIN_BASE_URL | https://api.jsonbin.io/v3/b | 远程 API 地址 |
/// | CONFIG_URL | - | 启动时拉取 `{remoteApiKey, remoteBinId}` |
/// | SYNC_INTERVAL_SECS | 30 | 自动同步间隔(秒) |
/// | REQUEST_TIMEOUT_MS | 15000 | 请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/freshmart JSONBIN_BIN_ID=65f0... cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    /// 日志目录，未设置时只输出到 stdout
    pub log_dir: Option<String>,
    /// 远程镜像配置
    pub remote: RemoteConfig,
    pub jsonbin_base_url: String,
    /// 配置端点 URL
    pub config_url: Option<String>,
    /// 自动同步间隔 (秒)
    pub sync_interval_secs: u64,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
            remote: RemoteConfig {
                api_key: std::env::var("JSONBIN_API_KEY").unwrap_or_default(),
                bin_id: std::env::var("JSONBIN_BIN_ID").unwrap_or_default(),
            },
            jsonbin_base_url: std::env::var("JSONBIN_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_JSONBIN_BASE_URL.into()),
            config_url: std::env::var("CONFIG_URL").ok().filter(|v| !v.is_empty()),
            sync_interval_secs: std::env::var("SYNC_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(30),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(15000),
        }
    }

    /// 使用自定义工作目录，其余保持默认
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            remote: RemoteConfig::default(),
            jsonbin_base_url: DEFAULT_JSONBIN_BASE_URL.into(),
            config_url: None,
            sync_interval_secs: 30,
            request_timeout_ms: 15000,
        }
    }

    pub fn work_dir(&self) -> &Path {
        Path::new(&self.work_dir)
    }

    pub fn db_path(&self) -> PathBuf {
        self.work_dir().join(crate::storage::DB_FILE)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Remote mirror credentials
///
/// Also the body served by the config endpoint. The legacy field names
/// `jsonbinApiKey`/`jsonbinBinId` are accepted.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    #[serde(default, rename = "remoteApiKey", alias = "jsonbinApiKey")]
    pub api_key: String,
    #[serde(default, rename = "remoteBinId", alias = "jsonbinBinId")]
    pub bin_id: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("bin_id", &self.bin_id)
            .finish()
    }
}

fn is_usable(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !PLACEHOLDERS.contains(&value)
}

impl RemoteConfig {
    pub fn new(api_key: impl Into<String>, bin_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            bin_id: bin_id.into(),
        }
    }

    /// Both the key and the bin id are real values
    pub fn is_configured(&self) -> bool {
        is_usable(&self.api_key) && is_usable(&self.bin_id)
    }

    /// Fill fields that are unusable here from `other`
    pub fn merge(&mut self, other: RemoteConfig) {
        if !is_usable(&self.api_key) && is_usable(&other.api_key) {
            self.api_key = other.api_key;
        }
        if !is_usable(&self.bin_id) && is_usable(&other.bin_id) {
            self.bin_id = other.bin_id;
        }
    }
}

/// Fetch remote credentials from the config endpoint
pub async fn fetch_remote_config(url: &str, timeout: Duration) -> Result<RemoteConfig, AppError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::network(format!("Config request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(AppError::config(format!(
            "Config endpoint returned status {status}"
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::config(format!("Failed to parse config response: {e}")))
}

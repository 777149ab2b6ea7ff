use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 默认的注册中心地址
pub const DEFAULT_ZONE: &str = "http://localhost:8761/eureka/";
/// 默认的应用名
pub const DEFAULT_APP: &str = "server";
/// 环境变量前缀
pub const ENV_PREFIX: &str = "EUREKA_";

/// 配置加载错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to read config from environment: {0}")]
    Env(#[from] envy::Error),
}

/// Eureka 客户端配置
///
/// 所有字段都有默认值，构造客户端之后只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 注册中心地址，以 `/` 结尾
    pub default_zone: String,
    /// 心跳（续约）间隔，秒
    pub renewal_interval_in_secs: u64,
    /// 拉取注册表间隔，秒
    pub registry_fetch_interval_seconds: u64,
    /// 租约时长，秒
    pub duration_in_secs: u64,
    /// 应用名，会被转换为小写
    pub app: String,
    pub port: u16,
    pub secure_port: u16,
    /// 实例 ID，默认 `ip:app:port`
    pub instance_id: Option<String>,
    /// 本机 IP，未设置时自动探测
    pub ip: Option<String>,
    /// 主机名，默认与 IP 相同
    pub hostname: Option<String>,
    /// 自定义元数据
    pub metadata: HashMap<String, serde_json::Value>,
    /// 单次请求超时，秒
    pub request_timeout_secs: u64,
    /// 连接超时，秒
    pub connect_timeout_secs: u64,
    /// 是否监听终止信号并自动注销
    pub shutdown_on_signal: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_zone: DEFAULT_ZONE.to_string(),
            renewal_interval_in_secs: 30,
            registry_fetch_interval_seconds: 15,
            duration_in_secs: 90,
            app: DEFAULT_APP.to_string(),
            port: 80,
            secure_port: 443,
            instance_id: None,
            ip: None,
            hostname: None,
            metadata: HashMap::new(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            shutdown_on_signal: true,
        }
    }
}

impl ClientConfig {
    /// 从 TOML 文件加载配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: ClientConfig = toml::from_str(&config_str)?;
        Ok(config.normalized())
    }

    /// 从 `EUREKA_*` 环境变量加载配置（会先读取 `.env`）
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config: ClientConfig = envy::prefixed(ENV_PREFIX).from_env()?;
        Ok(config.normalized())
    }

    /// 配置文件存在时从文件加载，否则读取环境变量
    pub fn load_or_env(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!(path = %path.display(), "Loading client config from file");
            Self::load(path)
        } else {
            tracing::info!("Config file not found, loading client config from environment");
            Self::from_env()
        }
    }

    /// 为空值或零值补齐默认值
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();

        if self.default_zone.trim().is_empty() {
            self.default_zone = defaults.default_zone;
        }
        if !self.default_zone.ends_with('/') {
            self.default_zone.push('/');
        }
        if self.renewal_interval_in_secs == 0 {
            self.renewal_interval_in_secs = defaults.renewal_interval_in_secs;
        }
        if self.registry_fetch_interval_seconds == 0 {
            self.registry_fetch_interval_seconds = defaults.registry_fetch_interval_seconds;
        }
        if self.duration_in_secs == 0 {
            self.duration_in_secs = defaults.duration_in_secs;
        }
        if self.app.trim().is_empty() {
            self.app = defaults.app;
        }
        self.app = self.app.to_lowercase();
        if self.port == 0 {
            self.port = defaults.port;
        }
        if self.secure_port == 0 {
            self.secure_port = defaults.secure_port;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = defaults.request_timeout_secs;
        }
        if self.connect_timeout_secs == 0 {
            self.connect_timeout_secs = defaults.connect_timeout_secs;
        }
        self.instance_id = self.instance_id.filter(|id| !id.trim().is_empty());
        self.ip = self.ip.filter(|ip| !ip.trim().is_empty());
        self.hostname = self.hostname.filter(|host| !host.trim().is_empty());

        self
    }

    pub fn renewal_interval(&self) -> Duration {
        Duration::from_secs(self.renewal_interval_in_secs)
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.registry_fetch_interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use http::StatusCode;
use http::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;

use super::RegistryTransport;
use super::error::{RegistryError, RegistryResult};
use crate::config::ClientConfig;
use crate::services::instance::{InstanceInfo, InstanceStatus};
use crate::services::registry::Applications;

/// HTTP 传输配置
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// 单次请求超时时间
    pub request_timeout: Duration,
    /// 连接超时时间
    pub connect_timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ClientConfig> for HttpTransportConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            connect_timeout: config.connect_timeout(),
        }
    }
}

// 注册请求体：{"instance": {...}}
#[derive(Serialize)]
struct InstanceEnvelope<'a> {
    instance: &'a InstanceInfo,
}

/// 基于 Eureka REST API 的传输实现
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    // 实例数据不变，心跳一直使用创建时的时间戳
    last_dirty_timestamp: u128,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> RegistryResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let last_dirty_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        Ok(Self {
            client,
            last_dirty_timestamp,
        })
    }

    pub fn last_dirty_timestamp(&self) -> u128 {
        self.last_dirty_timestamp
    }

    fn instance_url(zone: &str, app: &str, instance_id: &str) -> String {
        format!("{zone}apps/{app}/{instance_id}")
    }
}

#[async_trait::async_trait]
impl RegistryTransport for HttpTransport {
    async fn register(&self, zone: &str, app: &str, instance: &InstanceInfo) -> RegistryResult<()> {
        let url = format!("{zone}apps/{app}");
        let response = self
            .client
            .post(&url)
            .json(&InstanceEnvelope { instance })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RegistryError::UnexpectedStatus {
                operation: "register",
                status,
            })
        }
    }

    async fn deregister(&self, zone: &str, app: &str, instance_id: &str) -> RegistryResult<()> {
        let url = Self::instance_url(zone, app, instance_id);
        let response = self.client.delete(&url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(RegistryError::UnexpectedStatus {
                operation: "deregister",
                status,
            }),
        }
    }

    async fn heartbeat(&self, zone: &str, app: &str, instance_id: &str) -> RegistryResult<()> {
        let url = Self::instance_url(zone, app, instance_id);
        let last_dirty_timestamp = self.last_dirty_timestamp.to_string();
        let response = self
            .client
            .put(&url)
            .query(&[
                ("status", InstanceStatus::Up.as_str()),
                ("lastDirtyTimestamp", last_dirty_timestamp.as_str()),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => Err(RegistryError::LeaseNotFound {
                app: app.to_string(),
                instance_id: instance_id.to_string(),
            }),
            status => Err(RegistryError::UnexpectedStatus {
                operation: "heartbeat",
                status,
            }),
        }
    }

    async fn fetch_all(&self, zone: &str) -> RegistryResult<Applications> {
        let url = format!("{zone}apps");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RegistryError::UnexpectedStatus {
                operation: "fetch applications",
                status,
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(RegistryError::MalformedResponse("empty body".to_string()));
        }
        Ok(Applications::from_json(&body)?)
    }
}

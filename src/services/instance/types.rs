use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// 默认数据中心类名
pub const DEFAULT_DATA_CENTER_CLASS: &str = "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo";
/// 默认数据中心名
pub const DEFAULT_DATA_CENTER_NAME: &str = "MyOwn";

// 实例状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Up,
    Down,
    Starting,
    OutOfService,
    #[default]
    #[serde(other)]
    Unknown,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Up => "UP",
            InstanceStatus::Down => "DOWN",
            InstanceStatus::Starting => "STARTING",
            InstanceStatus::OutOfService => "OUT_OF_SERVICE",
            InstanceStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 端口包装，对应 `{"$": 8080, "@enabled": "true"}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortWrapper {
    #[serde(rename = "$", default, deserialize_with = "de_port")]
    pub port: u16,
    #[serde(rename = "@enabled", default, deserialize_with = "de_flag")]
    pub enabled: String,
}

impl PortWrapper {
    pub fn enabled(port: u16) -> Self {
        Self {
            port,
            enabled: "true".to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.eq_ignore_ascii_case("true")
    }
}

/// 数据中心信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataCenterInfo {
    #[serde(rename = "@class")]
    pub class: String,
    pub name: String,
}

impl Default for DataCenterInfo {
    fn default() -> Self {
        Self {
            class: DEFAULT_DATA_CENTER_CLASS.to_string(),
            name: DEFAULT_DATA_CENTER_NAME.to_string(),
        }
    }
}

/// 租约信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaseInfo {
    pub renewal_interval_in_secs: u64,
    pub duration_in_secs: u64,
}

/// 服务实例描述
///
/// 同时用于本机实例的注册请求体和从注册中心拉取的远端实例。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceInfo {
    pub instance_id: String,
    pub host_name: String,
    pub app: String,
    pub ip_addr: String,
    pub status: InstanceStatus,
    #[serde(alias = "overriddenstatus")]
    pub overridden_status: InstanceStatus,
    pub port: PortWrapper,
    pub secure_port: PortWrapper,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vip_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secure_vip_address: String,
    pub data_center_info: DataCenterInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_info: Option<LeaseInfo>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_url: Option<String>,
}

impl InstanceInfo {
    pub fn is_up(&self) -> bool {
        self.status == InstanceStatus::Up
    }

    /// 复制一份指定状态的实例
    pub fn with_status(&self, status: InstanceStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

// 注册中心可能以数字或字符串返回端口
fn de_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u16),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(port) => Ok(port),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn de_flag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Str(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(flag) => flag.to_string(),
        Raw::Str(s) => s,
    })
}

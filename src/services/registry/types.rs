use serde::{Deserialize, Deserializer, Serialize};

use crate::services::instance::InstanceInfo;

// `GET apps` 的响应体：{"applications": {...}}
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationsEnvelope {
    pub applications: RawApplications,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawApplications {
    #[serde(rename = "versions__delta", deserialize_with = "de_lenient_string")]
    pub versions_delta: String,
    #[serde(rename = "apps__hashcode", deserialize_with = "de_lenient_string")]
    pub apps_hashcode: String,
    #[serde(deserialize_with = "de_one_or_many")]
    pub application: Vec<RawApplication>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawApplication {
    pub name: String,
    #[serde(deserialize_with = "de_one_or_many")]
    pub instance: Vec<InstanceInfo>,
}

/// 单个应用及其实例列表
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Application {
    pub name: String,
    pub instances: Vec<InstanceInfo>,
}

// 只有一个元素时，注册中心可能返回对象而不是数组
fn de_one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

fn de_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

use serde::Serialize;

use super::types::{Application, ApplicationsEnvelope};
use crate::services::instance::InstanceInfo;

/// 注册中心全量应用列表的快照
///
/// 每次拉取成功后整体替换，不做增量合并。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Applications {
    pub versions_delta: String,
    pub apps_hashcode: String,
    pub applications: Vec<Application>,
}

impl Applications {
    /// 解析 `GET apps` 的 JSON 响应，保留所有状态的实例
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: ApplicationsEnvelope = serde_json::from_slice(body)?;
        Ok(envelope.into())
    }

    /// 只保留状态为 UP 的实例，没有 UP 实例的应用一并丢弃
    pub fn into_up_only(self) -> Self {
        let applications = self
            .applications
            .into_iter()
            .filter_map(|mut app| {
                app.instances.retain(InstanceInfo::is_up);
                (!app.instances.is_empty()).then_some(app)
            })
            .collect();

        Self {
            applications,
            ..self
        }
    }

    /// 按名称精确匹配（区分大小写）
    pub fn get(&self, name: &str) -> Option<&Application> {
        self.applications.iter().find(|app| app.name == name)
    }

    /// 返回指定应用实例列表的副本，不存在时返回空列表
    pub fn instances_of(&self, name: &str) -> Vec<InstanceInfo> {
        self.get(name)
            .map(|app| app.instances.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn instance_count(&self) -> usize {
        self.applications.iter().map(|app| app.instances.len()).sum()
    }
}

impl From<ApplicationsEnvelope> for Applications {
    fn from(envelope: ApplicationsEnvelope) -> Self {
        let raw = envelope.applications;
        Self {
            versions_delta: raw.versions_delta,
            apps_hashcode: raw.apps_hashcode,
            applications: raw
                .application
                .into_iter()
                .map(|app| Application {
                    name: app.name,
                    instances: app.instance,
                })
                .collect(),
        }
    }
}

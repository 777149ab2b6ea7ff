//! Registry transport module
//!
//! The four remote operations the client needs, behind the `RegistryTransport`
//! trait, plus the reqwest-backed implementation speaking the Eureka REST API.

pub mod error;
pub mod rest;

use async_trait::async_trait;

use crate::services::instance::InstanceInfo;
use crate::services::registry::Applications;

pub use error::{RegistryError, RegistryResult};
pub use rest::{HttpTransport, HttpTransportConfig};

/// 与注册中心的远程交互
///
/// `zone` 为注册中心地址（以 `/` 结尾）。实现方负责请求超时。
#[async_trait]
pub trait RegistryTransport: Send + Sync + 'static {
    /// `POST {zone}apps/{app}`
    async fn register(&self, zone: &str, app: &str, instance: &InstanceInfo) -> RegistryResult<()>;

    /// `DELETE {zone}apps/{app}/{instance_id}`
    async fn deregister(&self, zone: &str, app: &str, instance_id: &str) -> RegistryResult<()>;

    /// `PUT {zone}apps/{app}/{instance_id}`
    ///
    /// 服务端不存在该租约时返回 [`RegistryError::LeaseNotFound`]。
    async fn heartbeat(&self, zone: &str, app: &str, instance_id: &str) -> RegistryResult<()>;

    /// `GET {zone}apps`，返回未过滤的全量应用列表
    async fn fetch_all(&self, zone: &str) -> RegistryResult<Applications>;
}

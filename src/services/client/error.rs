use crate::services::instance::InstanceError;
use crate::services::transport::RegistryError;

/// 客户端构造错误
///
/// 周期任务中的错误只记录日志，不会通过这里向外传播。
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build local instance: {0}")]
    Instance(#[from] InstanceError),
    #[error("failed to build registry transport: {0}")]
    Transport(#[from] RegistryError),
}

use http::StatusCode;

/// 注册中心交互错误
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{operation} failed, status: {status}")]
    UnexpectedStatus {
        operation: &'static str,
        status: StatusCode,
    },
    #[error("lease not found for instance {instance_id} of {app}")]
    LeaseNotFound { app: String, instance_id: String },
    #[error("failed to parse registry response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed registry response: {0}")]
    MalformedResponse(String),
}

impl RegistryError {
    /// 租约已在服务端失效，需要重新注册
    pub fn is_lease_not_found(&self) -> bool {
        matches!(self, RegistryError::LeaseNotFound { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RegistryError::Http(e) if e.is_timeout())
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

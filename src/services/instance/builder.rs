use std::net::IpAddr;

use crate::config::ClientConfig;
use super::types::{DataCenterInfo, InstanceInfo, InstanceStatus, LeaseInfo, PortWrapper};

/// 实例构造错误
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("failed to inspect local network interfaces: {0}")]
    LocalIp(#[from] local_ip_address::Error),
    #[error("no non-loopback IPv4 address found on local interfaces")]
    NoLocalIpv4,
}

/// 返回第一个非回环的 IPv4 地址
pub fn detect_local_ipv4() -> Result<String, InstanceError> {
    let interfaces = local_ip_address::list_afinet_netifas()?;
    let ip = first_non_loopback_ipv4(interfaces.iter().map(|(_, ip)| *ip))
        .ok_or(InstanceError::NoLocalIpv4)?;

    tracing::debug!(ip = %ip, "Detected local IP address");
    Ok(ip.to_string())
}

fn first_non_loopback_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    addrs
        .into_iter()
        .find(|ip| ip.is_ipv4() && !ip.is_loopback())
}

/// 根据配置构造本机实例描述
#[derive(Debug, Clone)]
pub struct InstanceBuilder<'a> {
    config: &'a ClientConfig,
}

impl<'a> InstanceBuilder<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// 使用配置中的 IP，未配置时探测本机地址
    pub fn build(&self) -> Result<InstanceInfo, InstanceError> {
        let ip = match &self.config.ip {
            Some(ip) => ip.clone(),
            None => detect_local_ipv4()?,
        };
        Ok(self.build_with_ip(&ip))
    }

    pub fn build_with_ip(&self, ip: &str) -> InstanceInfo {
        let config = self.config;
        let app = config.app.to_lowercase();
        let host_name = config.hostname.clone().unwrap_or_else(|| ip.to_string());
        let instance_id = config
            .instance_id
            .clone()
            .unwrap_or_else(|| format!("{}:{}:{}", ip, app, config.port));
        let base_url = format!("http://{}:{}", ip, config.port);

        InstanceInfo {
            instance_id,
            host_name,
            app: app.clone(),
            ip_addr: ip.to_string(),
            // 注册成功前视为 DOWN
            status: InstanceStatus::Down,
            overridden_status: InstanceStatus::Unknown,
            port: PortWrapper::enabled(config.port),
            secure_port: PortWrapper::enabled(config.secure_port),
            vip_address: app.clone(),
            secure_vip_address: app,
            data_center_info: DataCenterInfo::default(),
            lease_info: Some(LeaseInfo {
                renewal_interval_in_secs: config.renewal_interval_in_secs,
                duration_in_secs: config.duration_in_secs,
            }),
            metadata: config.metadata.clone(),
            home_page_url: Some(format!("{base_url}/")),
            status_page_url: Some(format!("{base_url}/info")),
            health_check_url: Some(format!("{base_url}/health")),
        }
    }
}

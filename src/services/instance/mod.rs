//! Instance descriptor module
//!
//! - `types`: Eureka instance wire types
//! - `builder`: descriptor construction from config and local network inspection

pub mod builder;
pub mod types;

pub use builder::{InstanceBuilder, InstanceError, detect_local_ipv4};
pub use types::{DataCenterInfo, InstanceInfo, InstanceStatus, LeaseInfo, PortWrapper};

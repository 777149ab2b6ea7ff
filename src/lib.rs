//! Eureka client
//!
//! Keeps the local service instance registered with a Eureka registry
//! (lazy registration, heartbeat renewal, re-registration on lease loss,
//! deregistration on shutdown) and maintains a periodically refreshed,
//! UP-only view of all other registered applications.

pub mod config;
pub mod services;

pub use config::{ClientConfig, ConfigError};
pub use services::*;

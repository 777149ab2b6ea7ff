//! Client lifecycle module
//!
//! - `controller`: the `EurekaClient` state machine and its single-cycle operations
//! - `tasks`: heartbeat, refresh and signal-listener background tasks
//! - `state`: lifecycle and the lock-guarded shared state

pub mod controller;
pub mod error;
pub mod signal;
pub mod state;
mod tasks;

pub use controller::{ClientBuilder, EurekaClient, Renewal};
pub use error::ClientError;
pub use signal::termination_signal;
pub use state::Lifecycle;

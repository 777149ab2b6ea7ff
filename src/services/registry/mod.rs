//! Application cache module
//!
//! - `types`: wire types of the `GET apps` response
//! - `snapshot`: the immutable, wholesale-replaced registry snapshot

pub mod snapshot;
pub mod types;

pub use snapshot::Applications;
pub use types::Application;

pub mod client;
pub mod instance;
pub mod logger;
pub mod registry;
pub mod transport;

pub use client::{ClientBuilder, ClientError, EurekaClient, Lifecycle, Renewal};
pub use instance::{InstanceInfo, InstanceStatus};
pub use logger::{Logger, TracingLogger};
pub use registry::{Application, Applications};
pub use transport::{HttpTransport, RegistryError, RegistryTransport};

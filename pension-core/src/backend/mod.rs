pub mod client;
pub mod factory;

pub use client::{BackendError, PensionBackend, check_health};
pub use factory::{BackendConfig, BackendFactory, BackendRegistry};

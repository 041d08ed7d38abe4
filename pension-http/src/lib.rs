mod client;
mod factory;

pub use client::HttpBackend;
pub use factory::HttpBackendFactory;

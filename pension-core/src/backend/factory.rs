use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::client::{BackendError, PensionBackend};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Backend-agnostic connection configuration.
///
/// `kind` must match the [`BackendFactory::kind`] of a registered factory.
///
/// | kind   | base_url examples         |
/// |--------|---------------------------|
/// | `http` | `http://localhost:8000`   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"http"`).
    pub kind: String,
    pub base_url: String,
    /// Client-side bound on calculation submission.
    pub timeout: Duration,
    pub health_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: "http".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }
}

/// One implementation per backend transport. Each backend crate exports a
/// unit struct implementing this trait, registered with a
/// [`BackendRegistry`] at startup.
#[async_trait]
pub trait BackendFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn kind(&self) -> &'static str;

    /// Build a ready-to-use backend client.
    async fn create(&self, config: &BackendConfig) -> Result<Box<dyn PensionBackend>, BackendError>;
}

/// Registry of [`BackendFactory`] instances, keyed by kind.
pub struct BackendRegistry {
    factories: HashMap<&'static str, Box<dyn BackendFactory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory. A factory with the same kind is silently replaced.
    pub fn register(&mut self, factory: Box<dyn BackendFactory>) {
        self.factories.insert(factory.kind(), factory);
    }

    /// Kinds of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory matching `config.kind`.
    ///
    /// # Errors
    /// * [`BackendError::Configuration`] when no factory is registered for the kind.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &BackendConfig,
    ) -> Result<Box<dyn PensionBackend>, BackendError> {
        let factory = self.factories.get(config.kind.as_str()).ok_or_else(|| {
            BackendError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.kind,
                self.available_backends()
            ))
        })?;

        factory.create(config).await
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

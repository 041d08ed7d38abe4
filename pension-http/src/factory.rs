use async_trait::async_trait;

use pension_core::{BackendConfig, BackendError, BackendFactory, PensionBackend};

use crate::client::HttpBackend;

/// [`BackendFactory`] for the JSON HTTP service.
///
/// ```rust,no_run
/// use pension_core::BackendRegistry;
/// use pension_http::HttpBackendFactory;
///
/// let mut registry = BackendRegistry::new();
/// registry.register(Box::new(HttpBackendFactory));
/// ```
pub struct HttpBackendFactory;

#[async_trait]
impl BackendFactory for HttpBackendFactory {
    fn kind(&self) -> &'static str {
        "http"
    }

    /// Builds the client; no request is sent until the backend is used.
    async fn create(
        &self,
        config: &BackendConfig,
    ) -> Result<Box<dyn PensionBackend>, BackendError> {
        let backend = HttpBackend::from_config(config)?;
        tracing::debug!(base_url = backend.base_url(), "created HTTP backend");
        Ok(Box::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use pension_core::BackendRegistry;

    use super::*;

    #[test]
    fn kind_is_http() {
        assert_eq!(HttpBackendFactory.kind(), "http");
    }

    #[tokio::test]
    async fn registry_creates_http_backend_from_default_config() {
        let mut registry = BackendRegistry::new();
        registry.register(Box::new(HttpBackendFactory));

        let result = registry.create(&BackendConfig::default()).await;
        assert!(result.is_ok(), "expected backend, got {:#?}", result.err());
    }

    #[tokio::test]
    async fn bad_base_url_is_a_configuration_error() {
        let config = BackendConfig {
            base_url: "::".to_string(),
            ..BackendConfig::default()
        };

        assert!(matches!(
            HttpBackendFactory.create(&config).await,
            Err(BackendError::Configuration(_))
        ));
    }
}

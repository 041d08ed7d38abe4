use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use pension_core::backend::factory::DEFAULT_HEALTH_TIMEOUT;
use pension_core::{
    AnalysisReply, AnalysisReport, AssistantProfile, BackendConfig, BackendError,
    CalculationDetail, CalculationPage, CalculationRequest, CalculationResponse, ChatMessage,
    ChatReply, HealthStatus, PensionBackend, Statistics,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// JSON-over-HTTP client for the pension service.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    timeout: Duration,
    health_timeout: Duration,
}

impl HttpBackend {
    /// Builds a client for `base_url` with `timeout` applied to every request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| BackendError::Configuration(format!("invalid base url '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(BackendError::Configuration(format!(
                "unsupported scheme '{}'",
                base_url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| BackendError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut backend = Self::new(&config.base_url, config.timeout)?;
        backend.health_timeout = config.health_timeout;
        Ok(backend)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn transport_error(&self, error: reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else if error.is_decode() {
            BackendError::Decode(error.to_string())
        } else {
            BackendError::Transport(error.to_string())
        }
    }

    /// Passes 2xx responses through; everything else becomes a [`BackendError`].
    async fn check(&self, response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                debug!(%error, "could not read error body");
                String::new()
            }
        };
        warn!(status = status.as_u16(), %body, "backend returned an error status");
        Err(BackendError::from_status(status.as_u16(), body))
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, BackendError> {
        let response = self.check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn bytes(&self, response: Response) -> Result<Vec<u8>, BackendError> {
        let response = self.check(response).await?;
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl PensionBackend for HttpBackend {
    async fn submit_calculation(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, BackendError> {
        debug!(age = request.age, jobs = request.jobs.len(), "POST /calculations");
        let response = self
            .client
            .post(self.url("/calculations"))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn analyze_calculation(
        &self,
        request: &CalculationRequest,
    ) -> Result<AnalysisReport, BackendError> {
        debug!(age = request.age, "POST /calculations/analyze");
        let response = self
            .client
            .post(self.url("/calculations/analyze"))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode::<AnalysisReply>(response).await?.into_report()
    }

    async fn list_calculations(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<CalculationPage, BackendError> {
        let response = self
            .client
            .get(self.url("/calculations"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn get_calculation(&self, id: &str) -> Result<CalculationDetail, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("/calculations/{id}")))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn download_calculation(&self, id: &str) -> Result<Vec<u8>, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("/calculations/{id}/download")))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.bytes(response).await
    }

    async fn export_calculations(&self, lang: &str) -> Result<Vec<u8>, BackendError> {
        let response = self
            .client
            .get(self.url("/calculations/export"))
            .query(&[("lang", lang)])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.bytes(response).await
    }

    async fn get_statistics(&self) -> Result<Statistics, BackendError> {
        let response = self
            .client
            .get(self.url("/statistics"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn chat(&self, message: &ChatMessage) -> Result<ChatReply, BackendError> {
        let response = self
            .client
            .post(self.url("/chat/owl"))
            .json(message)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn assistant_profile(&self) -> Result<AssistantProfile, BackendError> {
        let response = self
            .client
            .get(self.url("/chat/owl/info"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        let response = self
            .client
            .get(self.url("/health"))
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| match self.transport_error(e) {
                BackendError::Timeout(_) => BackendError::Timeout(self.health_timeout),
                other => other,
            })?;
        self.decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_not_doubled() {
        let backend = HttpBackend::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn rejects_malformed_base_url() {
        assert!(matches!(
            HttpBackend::new("not a url", Duration::from_secs(1)),
            Err(BackendError::Configuration(_))
        ));
        assert!(matches!(
            HttpBackend::new("ftp://example.com", Duration::from_secs(1)),
            Err(BackendError::Configuration(_))
        ));
    }
}

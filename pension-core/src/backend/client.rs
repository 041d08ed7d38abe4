use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    AnalysisReply, AnalysisReport, AssistantProfile, CalculationDetail, CalculationPage,
    CalculationRequest, CalculationResponse, ChatMessage, ChatReply, HealthStatus, Statistics,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// 400: the backend rejected the request body.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("record not found")]
    NotFound,

    /// 5xx
    #[error("server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// 2xx reply whose body reports a failure.
    #[error("service rejected the request: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BackendError {
    /// Maps a non-success HTTP status to the matching variant.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            400 => Self::InvalidInput(body),
            404 => Self::NotFound,
            500..=599 => Self::Server { status, body },
            _ => Self::UnexpectedStatus { status, body },
        }
    }
}

impl AnalysisReply {
    pub fn into_report(self) -> Result<AnalysisReport, BackendError> {
        match self {
            Self::Report(report) => Ok(report),
            Self::Failed { error } => Err(BackendError::Rejected(error)),
        }
    }
}

/// The remote pension service.
///
/// The calculation itself happens behind this trait; the client only
/// prepares requests and presents responses.
#[async_trait]
pub trait PensionBackend: Send + Sync {
    /// `POST /calculations`
    async fn submit_calculation(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, BackendError>;

    /// `POST /calculations/analyze`: written commentary on a scenario.
    async fn analyze_calculation(
        &self,
        request: &CalculationRequest,
    ) -> Result<AnalysisReport, BackendError>;

    /// `GET /calculations?page=&limit=`, pages counted from 1.
    async fn list_calculations(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<CalculationPage, BackendError>;

    /// `GET /calculations/{id}`
    async fn get_calculation(&self, id: &str) -> Result<CalculationDetail, BackendError>;

    /// `GET /calculations/{id}/download`: PDF report bytes.
    async fn download_calculation(&self, id: &str) -> Result<Vec<u8>, BackendError>;

    /// `GET /calculations/export`: XLS spreadsheet of stored calculations.
    async fn export_calculations(&self, lang: &str) -> Result<Vec<u8>, BackendError>;

    /// `GET /statistics`
    async fn get_statistics(&self) -> Result<Statistics, BackendError>;

    /// `POST /chat/owl`
    async fn chat(&self, message: &ChatMessage) -> Result<ChatReply, BackendError>;

    /// `GET /chat/owl/info`
    async fn assistant_profile(&self) -> Result<AssistantProfile, BackendError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus, BackendError>;
}

/// Whether the backend answers its health check within `timeout`.
/// Any failure counts as unhealthy.
pub async fn check_health(backend: &dyn PensionBackend, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, backend.health()).await {
        Ok(Ok(status)) => status.is_healthy(),
        Ok(Err(error)) => {
            tracing::debug!(%error, "health check failed");
            false
        }
        Err(_) => {
            tracing::debug!(?timeout, "health check timed out");
            false
        }
    }
}

//! The generation gateway trait and its HTTP implementation.

use async_trait::async_trait;

use cinestudio_core::job::JobPayload;

use crate::messages::{SubmitRequest, SubmitResponse};

/// Errors from the gateway boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Could not reach the backend or the HTTP exchange failed.
    #[error("Gateway request failed: {0}")]
    Request(String),

    /// The backend answered but reported a job failure.
    #[error("Generation backend failed: {0}")]
    Backend(String),

    /// The backend answered with a body we cannot interpret.
    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

/// The single boundary to the external synthesis backend.
///
/// `submit` suspends until the backend resolves; cancellation and liveness
/// timeouts are applied by the caller around this future.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Submit one generation job and wait for its media reference.
    async fn submit(&self, payload: &JobPayload) -> Result<String, GatewayError>;
}

/// HTTP client for a synthesis backend exposing `POST /generate`.
pub struct HttpGateway {
    base_url: String,
    http: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway targeting `base_url` (e.g. `http://localhost:8188`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl GenerationGateway for HttpGateway {
    async fn submit(&self, payload: &JobPayload) -> Result<String, GatewayError> {
        let request = SubmitRequest {
            request_id: uuid::Uuid::new_v4().to_string(),
            payload: payload.clone(),
        };

        tracing::info!(
            request_id = %request.request_id,
            job_kind = payload.kind().as_str(),
            "Submitting generation job"
        );

        let response = self
            .http
            .post(format!("{}/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Backend(format!(
                "backend returned {status}: {body}"
            )));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(GatewayError::Backend(error));
        }
        let media_url = body.media_url.ok_or_else(|| {
            GatewayError::InvalidResponse("response carried neither media_url nor error".into())
        })?;

        tracing::info!(
            request_id = %request.request_id,
            media_url = %media_url,
            "Generation job resolved"
        );
        Ok(media_url)
    }
}

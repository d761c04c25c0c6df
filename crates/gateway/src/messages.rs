//! Wire types for the synthesis backend's submit endpoint.

use serde::{Deserialize, Serialize};

use cinestudio_core::job::JobPayload;

/// Request body for `POST {base_url}/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    /// Correlation ID echoed in backend logs; not used for polling.
    pub request_id: String,
    /// Tagged job description; the `kind` field selects the pipeline.
    #[serde(flatten)]
    pub payload: JobPayload,
}

/// Response body from the submit endpoint.
///
/// Exactly one of `media_url` or `error` is expected to be set.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub media_url: Option<String>,
    pub error: Option<String>,
}

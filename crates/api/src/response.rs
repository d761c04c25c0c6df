//! Response envelope for the HTTP surface.
//!
//! Every resource handler wraps its payload in a `{ "data": ... }` envelope;
//! error bodies use the `{ "error", "code" }` shape from [`crate::error`].
//! Use [`DataResponse`] instead of ad-hoc `serde_json::json!({ "data": ... })`
//! so the payload type stays visible in the handler signature.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

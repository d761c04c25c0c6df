//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the same router and middleware stack as `main.rs`, with the
//! generation gateway replaced by an in-process stub so dispatch endpoints
//! can be exercised without a synthesis backend.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cinestudio_api::config::ServerConfig;
use cinestudio_api::router::build_app_router;
use cinestudio_api::state::AppState;
use cinestudio_core::job::JobPayload;
use cinestudio_engine::Engine;
use cinestudio_events::EventBus;
use cinestudio_gateway::{GatewayError, GenerationGateway};

/// Gateway stub resolving every job with a fixed media path.
pub struct StubGateway(pub &'static str);

#[async_trait]
impl GenerationGateway for StubGateway {
    async fn submit(&self, _payload: &JobPayload) -> Result<String, GatewayError> {
        Ok(self.0.to_string())
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        gateway_url: "http://localhost:8188".to_string(),
        generation_timeout_secs: 600,
        stale_after_secs: 900,
        sweep_interval_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and an always-succeeding gateway stub.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_gateway(pool, StubGateway("/takes/stub.mp4"))
}

/// Build the application router with a caller-supplied gateway stub.
pub fn build_test_app_with_gateway(
    pool: PgPool,
    gateway: impl GenerationGateway + 'static,
) -> Router {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let engine = Engine::new(
        pool.clone(),
        Arc::new(gateway),
        Arc::clone(&event_bus),
        config.engine_config(),
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
        event_bus,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request and return the raw response.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a PUT request with a JSON body.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert status and return the parsed body in one step.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

use std::time::Duration;

use cinestudio_engine::EngineConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the generation backend (default: `http://localhost:8188`).
    pub gateway_url: String,
    /// Liveness window for a single generation job, in seconds (default: `600`).
    pub generation_timeout_secs: u64,
    /// Age at which an `animating` shot is considered abandoned (default: `900`).
    pub stale_after_secs: u64,
    /// Interval between stale-shot recovery sweeps (default: `30`).
    pub sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                   |
    /// |---------------------------|---------------------------|
    /// | `HOST`                    | `0.0.0.0`                 |
    /// | `PORT`                    | `3000`                    |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                      |
    /// | `GATEWAY_URL`             | `http://localhost:8188`   |
    /// | `GENERATION_TIMEOUT_SECS` | `600`                     |
    /// | `STALE_AFTER_SECS`        | `900`                     |
    /// | `SWEEP_INTERVAL_SECS`     | `30`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_u64("REQUEST_TIMEOUT_SECS", 30);
        let gateway_url =
            std::env::var("GATEWAY_URL").unwrap_or_else(|_| "http://localhost:8188".into());
        let generation_timeout_secs = env_u64("GENERATION_TIMEOUT_SECS", 600);
        let stale_after_secs = env_u64("STALE_AFTER_SECS", 900);
        let sweep_interval_secs = env_u64("SWEEP_INTERVAL_SECS", 30);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            gateway_url,
            generation_timeout_secs,
            stale_after_secs,
            sweep_interval_secs,
        }
    }

    /// Derive the engine tunables from the server configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            generation_timeout: Duration::from_secs(self.generation_timeout_secs),
            stale_after: Duration::from_secs(self.stale_after_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a valid u64"))
}

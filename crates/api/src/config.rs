//! Configuration loading and validation for the API service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.
//! Provider credentials are optional: without them the service still starts and
//! `POST /api/analyze` answers 500.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::nutrition::NutritionConfig;
use crate::server::middleware;

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`). Overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP/gRPC endpoint for span export. Export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// FatSecret OAuth client id.
    #[serde(default)]
    pub fatsecret_client_id: Option<String>,

    /// FatSecret OAuth client secret.
    #[serde(default)]
    pub fatsecret_client_secret: Option<String>,

    /// FatSecret OAuth token endpoint.
    #[serde(default = "default_fatsecret_token_url")]
    pub fatsecret_token_url: String,

    /// FatSecret image-recognition endpoint.
    #[serde(default = "default_fatsecret_api_url")]
    pub fatsecret_api_url: String,

    /// Timeout (seconds) for each outbound provider call.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,

    /// Timeout (seconds) for each inbound request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_listen_port() -> u16 {
    8000
}
fn default_log_level() -> String {
    "info".into()
}
fn default_fatsecret_token_url() -> String {
    "https://oauth.fatsecret.com/connect/token".into()
}
fn default_fatsecret_api_url() -> String {
    "https://platform.fatsecret.com/rest/image-recognition/v1".into()
}
fn default_upstream_timeout() -> u64 {
    30
}
fn default_request_timeout() -> u64 {
    middleware::REQUEST_TIMEOUT.as_secs()
}
fn default_max_upload_bytes() -> usize {
    middleware::MAX_BODY_BYTES
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen_port", &self.listen_port)
            .field("log_level", &self.log_level)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("fatsecret_client_id", &self.fatsecret_client_id)
            .field(
                "fatsecret_client_secret",
                &self.fatsecret_client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("fatsecret_token_url", &self.fatsecret_token_url)
            .field("fatsecret_api_url", &self.fatsecret_api_url)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.fatsecret_token_url, "FATSECRET_TOKEN_URL")?;
        ensure_non_empty(&self.fatsecret_api_url, "FATSECRET_API_URL")?;

        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be > 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be > 0");
        }
        Ok(())
    }

    /// Per-request timeout applied by the router.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Settings for the nutrition provider client.
    pub fn nutrition(&self) -> NutritionConfig {
        NutritionConfig {
            client_id: self.fatsecret_client_id.clone(),
            client_secret: self.fatsecret_client_secret.clone(),
            token_url: self.fatsecret_token_url.clone(),
            api_url: self.fatsecret_api_url.clone(),
            timeout: Duration::from_secs(self.upstream_timeout_secs),
        }
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(())
}

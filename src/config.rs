//! Service configuration loaded from environment variables.
//!
//! Both services read their settings once at startup. A `.env` file in the
//! working directory is honored before the process environment is consulted.

use serde::{de::DeserializeOwned, Deserialize};

/// Value the deployment tooling writes when a secret is deliberately absent.
pub const NOT_CONFIGURED: &str = "not-configured";

/// Backend service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_backend_port")]
    pub port: u16,

    /// Deployment tag reported as `environment` (read from `NODE_ENV`).
    #[serde(rename = "node_env", default = "default_environment")]
    pub environment: String,

    // === Telemetry ===
    /// Telemetry client identifier, echoed verbatim by `/api/metadata`.
    #[serde(rename = "appinsights_instrumentationkey", default = "default_client_id")]
    pub client_id: String,

    /// Optional port for the Prometheus exporter.
    #[serde(default)]
    pub metrics_port: Option<u16>,

    // === Database ===
    /// Connection string. Only its presence is ever inspected.
    #[serde(rename = "sql_connection_string", default)]
    pub connection_string: Option<String>,

    // === Demo Data ===
    /// Upper bound for `/api/data?count=`.
    #[serde(default = "default_data_max_items")]
    pub data_max_items: usize,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

/// Frontend service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FrontendConfig {
    /// HTTP listen port.
    #[serde(default = "default_frontend_port")]
    pub port: u16,

    /// Backend base URL substituted into the served page.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Optional port for the Prometheus exporter.
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_backend_port() -> u16 {
    3001
}

fn default_frontend_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "production".to_string()
}

fn default_client_id() -> String {
    NOT_CONFIGURED.to_string()
}

fn default_data_max_items() -> usize {
    10_000
}

fn default_api_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn load_from_env<T: DeserializeOwned>() -> Result<T, envy::Error> {
    dotenvy::dotenv().ok();
    envy::from_env()
}

impl BackendConfig {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        load_from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be between 1 and 65535".to_string());
        }

        if self.data_max_items == 0 {
            return Err("DATA_MAX_ITEMS must be at least 1".to_string());
        }

        if self.metrics_port == Some(self.port) {
            return Err("METRICS_PORT must differ from PORT".to_string());
        }

        Ok(())
    }

    /// Whether a real connection string was supplied.
    pub fn sql_configured(&self) -> bool {
        matches!(
            self.connection_string.as_deref(),
            Some(s) if !s.is_empty() && s != NOT_CONFIGURED
        )
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            port: default_backend_port(),
            environment: default_environment(),
            client_id: default_client_id(),
            metrics_port: None,
            connection_string: None,
            data_max_items: default_data_max_items(),
            rust_log: default_log_level(),
        }
    }
}

impl FrontendConfig {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        load_from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be between 1 and 65535".to_string());
        }

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(format!(
                "API_URL must start with http:// or https://, got {:?}",
                self.api_url
            ));
        }

        if self.metrics_port == Some(self.port) {
            return Err("METRICS_PORT must differ from PORT".to_string());
        }

        Ok(())
    }

    /// Backend base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            port: default_frontend_port(),
            api_url: default_api_url(),
            metrics_port: None,
            rust_log: default_log_level(),
        }
    }
}

//! Service configuration.
//!
//! Loaded once at startup from environment variables (optionally seeded from
//! a `.env` file) and shared read-only with every request.
//!
//! | Variable | Default |
//! |---|---|
//! | `SIMULATOR_SERVICE_URL` | `http://aer-simulator-service:5001` |
//! | `IBM_API_KEY` | unset |
//! | `IBM_INSTANCE` | unset |
//! | `IBM_QUANTUM_ENDPOINT` | `https://quantum.cloud.ibm.com/api` |
//! | `IBM_IAM_URL` | `https://iam.cloud.ibm.com/identity/token` |
//! | `TRANSPILER_ADDRESS` | `0.0.0.0:5002` |
//! | `TRANSPILER_EXECUTOR_TIMEOUT` | `300` (seconds) |
//! | `TRANSPILER_EXPOSE_TRACEBACK` | `true` |
//! | `TRANSPILER_LOG_FORMAT` | `console` |

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use qforge_adapter_ibm::{DEFAULT_ENDPOINT, DEFAULT_IAM_URL, RuntimeServiceOptions};

use crate::telemetry::LogFormat;

/// Default downstream executor.
pub const DEFAULT_SIMULATOR_SERVICE_URL: &str = "http://aer-simulator-service:5001";

/// Default listen address.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:5002";

/// Default executor timeout in seconds.
pub const DEFAULT_EXECUTOR_TIMEOUT_SECS: u64 = 300;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        variable: &'static str,
        value: String,
        reason: String,
    },
}

/// Transpiler service configuration.
#[derive(Clone)]
pub struct TranspilerConfig {
    /// Listen address.
    pub address: SocketAddr,
    /// Base URL of the executor; requests go to `{url}/execute`.
    pub simulator_service_url: String,
    /// IBM Cloud API key.
    pub ibm_api_key: Option<String>,
    /// IBM Quantum service instance (CRN).
    pub ibm_instance: Option<String>,
    /// IBM Quantum Cloud API endpoint.
    pub ibm_endpoint: String,
    /// IBM Cloud IAM token endpoint.
    pub ibm_iam_url: String,
    /// Client timeout for the executor call.
    pub executor_timeout: Duration,
    /// Whether 500 responses carry the error chain.
    pub expose_traceback: bool,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for TranspilerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([0, 0, 0, 0], 5002)),
            simulator_service_url: DEFAULT_SIMULATOR_SERVICE_URL.to_string(),
            ibm_api_key: None,
            ibm_instance: None,
            ibm_endpoint: DEFAULT_ENDPOINT.to_string(),
            ibm_iam_url: DEFAULT_IAM_URL.to_string(),
            executor_timeout: Duration::from_secs(DEFAULT_EXECUTOR_TIMEOUT_SECS),
            expose_traceback: true,
            log_format: LogFormat::Console,
        }
    }
}

impl fmt::Debug for TranspilerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranspilerConfig")
            .field("address", &self.address)
            .field("simulator_service_url", &self.simulator_service_url)
            .field("ibm_api_key", &self.ibm_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("ibm_instance", &self.ibm_instance)
            .field("ibm_endpoint", &self.ibm_endpoint)
            .field("ibm_iam_url", &self.ibm_iam_url)
            .field("executor_timeout", &self.executor_timeout)
            .field("expose_traceback", &self.expose_traceback)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn invalid(variable: &'static str, value: &str, reason: impl fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        variable,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(variable, value, "expected a boolean")),
    }
}

impl TranspilerConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Unset and empty variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = var("TRANSPILER_ADDRESS") {
            config.address = v
                .parse()
                .map_err(|e| invalid("TRANSPILER_ADDRESS", &v, e))?;
        }
        if let Some(v) = var("SIMULATOR_SERVICE_URL") {
            config.simulator_service_url = v.trim_end_matches('/').to_string();
        }
        config.ibm_api_key = var("IBM_API_KEY");
        config.ibm_instance = var("IBM_INSTANCE");
        if let Some(v) = var("IBM_QUANTUM_ENDPOINT") {
            config.ibm_endpoint = v;
        }
        if let Some(v) = var("IBM_IAM_URL") {
            config.ibm_iam_url = v;
        }
        if let Some(v) = var("TRANSPILER_EXECUTOR_TIMEOUT") {
            let secs: u64 = v
                .trim()
                .parse()
                .map_err(|e| invalid("TRANSPILER_EXECUTOR_TIMEOUT", &v, e))?;
            if secs == 0 {
                return Err(invalid("TRANSPILER_EXECUTOR_TIMEOUT", &v, "must be positive"));
            }
            config.executor_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = var("TRANSPILER_EXPOSE_TRACEBACK") {
            config.expose_traceback = parse_bool("TRANSPILER_EXPOSE_TRACEBACK", &v)?;
        }
        if let Some(v) = var("TRANSPILER_LOG_FORMAT") {
            config.log_format = v
                .parse()
                .map_err(|e| invalid("TRANSPILER_LOG_FORMAT", &v, e))?;
        }

        Ok(config)
    }

    /// URL of the executor's execute endpoint.
    pub fn execute_url(&self) -> String {
        format!("{}/execute", self.simulator_service_url)
    }

    /// Registry session options carrying the held credentials.
    pub fn registry_options(&self) -> RuntimeServiceOptions {
        RuntimeServiceOptions::new(self.ibm_api_key.clone(), self.ibm_instance.clone())
            .with_endpoint(self.ibm_endpoint.clone())
            .with_iam_url(self.ibm_iam_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<TranspilerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        TranspilerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.address, DEFAULT_ADDRESS.parse().unwrap());
        assert_eq!(config.execute_url(), "http://aer-simulator-service:5001/execute");
        assert_eq!(config.executor_timeout, Duration::from_secs(300));
        assert!(config.expose_traceback);
        assert_eq!(config.log_format, LogFormat::Console);
        assert!(config.ibm_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SIMULATOR_SERVICE_URL", "http://localhost:9000/"),
            ("IBM_API_KEY", "key"),
            ("IBM_INSTANCE", "crn:x"),
            ("TRANSPILER_ADDRESS", "127.0.0.1:8080"),
            ("TRANSPILER_EXECUTOR_TIMEOUT", "5"),
            ("TRANSPILER_EXPOSE_TRACEBACK", "false"),
            ("TRANSPILER_LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.execute_url(), "http://localhost:9000/execute");
        assert_eq!(config.ibm_api_key.as_deref(), Some("key"));
        assert_eq!(config.address.port(), 8080);
        assert_eq!(config.executor_timeout, Duration::from_secs(5));
        assert!(!config.expose_traceback);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = load(&[("IBM_API_KEY", ""), ("SIMULATOR_SERVICE_URL", " ")]).unwrap();
        assert!(config.ibm_api_key.is_none());
        assert_eq!(config.simulator_service_url, DEFAULT_SIMULATOR_SERVICE_URL);
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("TRANSPILER_ADDRESS", "nowhere")]).is_err());
        assert!(load(&[("TRANSPILER_EXECUTOR_TIMEOUT", "0")]).is_err());
        assert!(load(&[("TRANSPILER_EXECUTOR_TIMEOUT", "soon")]).is_err());
        assert!(load(&[("TRANSPILER_EXPOSE_TRACEBACK", "maybe")]).is_err());
        let err = load(&[("TRANSPILER_LOG_FORMAT", "xml")]).unwrap_err();
        assert!(err.to_string().contains("TRANSPILER_LOG_FORMAT"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = load(&[("IBM_API_KEY", "super-secret")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_registry_options() {
        let config = load(&[
            ("IBM_API_KEY", "key"),
            ("IBM_INSTANCE", "crn:x"),
            ("IBM_QUANTUM_ENDPOINT", "http://127.0.0.1:1/api"),
        ])
        .unwrap();
        let options = config.registry_options();
        assert_eq!(options.instance.as_deref(), Some("crn:x"));
        assert_eq!(options.endpoint, "http://127.0.0.1:1/api");
        assert_eq!(options.channel, qforge_adapter_ibm::CHANNEL);
    }
}

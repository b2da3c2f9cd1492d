//! IBM Quantum Platform API client.
//!
//! Only the read side of the Cloud API is implemented here:
//! - Authentication via IAM token exchange
//! - Backend configuration and calibration properties

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use qforge_compile::Target;

use crate::backend::{BackendConfiguration, BackendProperties, build_target};
use crate::error::{IbmError, IbmResult};

/// Default IBM Quantum Cloud API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// Default IBM Cloud IAM token endpoint.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// The only channel the registry speaks.
pub const CHANNEL: &str = "ibm_quantum_platform";

/// OAuth grant type for exchanging an API key.
const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// IBM API version header value.
const IBM_API_VERSION: &str = "2026-02-01";

/// User-Agent sent with requests; the default reqwest UA is blocked upstream.
const USER_AGENT: &str = concat!("qforge/", env!("CARGO_PKG_VERSION"));

/// How to reach and authenticate against the platform.
#[derive(Clone)]
pub struct RuntimeServiceOptions {
    /// IBM Cloud API key.
    pub api_key: Option<String>,
    /// Service instance CRN.
    pub instance: Option<String>,
    /// Channel name, must be [`CHANNEL`].
    pub channel: String,
    /// API endpoint URL.
    pub endpoint: String,
    /// IAM token endpoint URL.
    pub iam_url: String,
}

impl RuntimeServiceOptions {
    /// Options for the public platform with the given credentials.
    pub fn new(api_key: Option<String>, instance: Option<String>) -> Self {
        Self {
            api_key,
            instance,
            channel: CHANNEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            iam_url: DEFAULT_IAM_URL.to_string(),
        }
    }

    /// Override the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the IAM token endpoint.
    #[must_use]
    pub fn with_iam_url(mut self, iam_url: impl Into<String>) -> Self {
        self.iam_url = iam_url.into();
        self
    }
}

impl fmt::Debug for RuntimeServiceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeServiceOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("instance", &self.instance)
            .field("channel", &self.channel)
            .field("endpoint", &self.endpoint)
            .field("iam_url", &self.iam_url)
            .finish()
    }
}

/// IAM token response from `iam.cloud.ibm.com`.
#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
}

/// Authenticated session against the IBM Quantum Platform.
pub struct RuntimeService {
    client: Client,
    endpoint: String,
    instance: String,
}

impl fmt::Debug for RuntimeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeService")
            .field("endpoint", &self.endpoint)
            .field("instance", &self.instance)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl RuntimeService {
    /// Open a session.
    ///
    /// Exchanges the API key for an IAM bearer token and configures the
    /// Service-CRN header required by the Cloud API.
    pub async fn connect(options: &RuntimeServiceOptions) -> IbmResult<Self> {
        if options.channel != CHANNEL {
            return Err(IbmError::UnsupportedChannel(options.channel.clone()));
        }
        let api_key = options
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(IbmError::MissingApiKey)?;
        let instance = options
            .instance
            .as_deref()
            .filter(|i| !i.is_empty())
            .ok_or(IbmError::MissingInstance)?;

        let bearer_token = Self::exchange_api_key(&options.iam_url, api_key).await?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {bearer_token}"))
                .map_err(|_| IbmError::InvalidToken)?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::HeaderName::from_static("service-crn"),
            header::HeaderValue::from_str(instance)
                .map_err(|_| IbmError::InvalidParameter("invalid Service-CRN value".into()))?,
        );
        headers.insert(
            header::HeaderName::from_static("ibm-api-version"),
            header::HeaderValue::from_static(IBM_API_VERSION),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        info!(endpoint = %options.endpoint, "Connected to IBM Quantum Platform");
        Ok(Self {
            client,
            endpoint: options.endpoint.trim_end_matches('/').to_string(),
            instance: instance.to_string(),
        })
    }

    async fn exchange_api_key(iam_url: &str, api_key: &str) -> IbmResult<String> {
        let iam_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let response = iam_client
            .post(iam_url)
            .header(header::ACCEPT, "application/json")
            .form(&[("grant_type", IAM_GRANT_TYPE), ("apikey", api_key)])
            .send()
            .await
            .map_err(|e| IbmError::IamTokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(IbmError::IamTokenExchange(format!(
                "IAM returned {status}: {body}"
            )));
        }

        let token: IamTokenResponse = response.json().await.map_err(|e| {
            IbmError::IamTokenExchange(format!("failed to parse IAM response: {e}"))
        })?;
        Ok(token.access_token)
    }

    /// API endpoint this session talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch a backend's static configuration.
    pub async fn configuration(&self, name: &str) -> IbmResult<BackendConfiguration> {
        let url = format!("{}/v1/backends/{}/configuration", self.endpoint, name);
        match self.get_json(&url).await? {
            Some(config) => Ok(config),
            None => Err(IbmError::BackendUnavailable(name.to_string())),
        }
    }

    /// Fetch a backend's latest calibration, if it publishes one.
    pub async fn properties(&self, name: &str) -> IbmResult<Option<BackendProperties>> {
        let url = format!("{}/v1/backends/{}/properties", self.endpoint, name);
        self.get_json(&url).await
    }

    /// Resolve a backend name into a compilation target.
    ///
    /// Missing calibration data is not an error: the target is then built
    /// from the configuration alone.
    pub async fn target(&self, name: &str) -> IbmResult<Target> {
        let config = self.configuration(name).await?;
        let properties = self.properties(name).await?;
        debug!(
            backend = name,
            num_qubits = config.n_qubits,
            calibrated = properties.is_some(),
            "Fetched backend description"
        );
        build_target(name, &config, properties.as_ref())
    }

    /// GET a JSON document. 404 maps to `None`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> IbmResult<Option<T>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(IbmError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_is_cloud() {
        assert!(DEFAULT_ENDPOINT.contains("quantum.cloud.ibm.com"));
        assert!(DEFAULT_IAM_URL.contains("iam.cloud.ibm.com"));
    }

    #[test]
    fn test_options_debug_redacts_key() {
        let options = RuntimeServiceOptions::new(Some("secret-key".into()), Some("crn:x".into()));
        let debug = format!("{options:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("crn:x"));
    }

    #[test]
    fn test_iam_token_response_deserialization() {
        let json = r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600}"#;
        let token: IamTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "abc");
    }

    #[tokio::test]
    async fn test_connect_without_key_fails_before_network() {
        let options = RuntimeServiceOptions::new(None, Some("crn:x".into()))
            .with_iam_url("http://127.0.0.1:1/unreachable");
        let err = RuntimeService::connect(&options).await.unwrap_err();
        assert!(matches!(err, IbmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_connect_without_instance_fails() {
        let options = RuntimeServiceOptions::new(Some("key".into()), Some(String::new()));
        let err = RuntimeService::connect(&options).await.unwrap_err();
        assert!(matches!(err, IbmError::MissingInstance));
    }

    #[tokio::test]
    async fn test_connect_rejects_other_channels() {
        let mut options = RuntimeServiceOptions::new(Some("key".into()), Some("crn:x".into()));
        options.channel = "ibm_cloud".into();
        let err = RuntimeService::connect(&options).await.unwrap_err();
        assert!(matches!(err, IbmError::UnsupportedChannel(ref c) if c == "ibm_cloud"));
    }
}

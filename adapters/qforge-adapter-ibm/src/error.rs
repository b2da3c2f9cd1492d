//! Error types for the IBM Quantum registry.

use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors that can occur while resolving a backend on IBM Quantum.
#[derive(Debug, Error)]
pub enum IbmError {
    /// Missing API key.
    #[error("IBM Quantum API key not found. Set the IBM_API_KEY environment variable.")]
    MissingApiKey,

    /// Missing service instance.
    #[error("IBM_INSTANCE environment variable is required when using IBM_API_KEY")]
    MissingInstance,

    /// Unsupported channel.
    #[error("Unsupported channel '{0}' (expected 'ibm_quantum_platform')")]
    UnsupportedChannel(String),

    /// Bearer token cannot be used as a header value.
    #[error("Invalid IBM Quantum bearer token")]
    InvalidToken,

    /// IAM token exchange failed.
    #[error("IAM token exchange failed: {0}")]
    IamTokenExchange(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("IBM Quantum API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Backend not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Backend description cannot be turned into a compilation target.
    #[error("Invalid target for backend '{backend}'")]
    InvalidTarget {
        /// Backend name.
        backend: String,
        /// Underlying validation error.
        #[source]
        source: qforge_compile::CompileError,
    },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl IbmError {
    /// Whether the error stems from credentials rather than the backend.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey | Self::MissingInstance | Self::InvalidToken | Self::IamTokenExchange(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    // -- Display message tests --

    #[test]
    fn test_missing_api_key_display() {
        let err = IbmError::MissingApiKey;
        assert!(err.to_string().contains("IBM_API_KEY"));
    }

    #[test]
    fn test_missing_instance_display() {
        let err = IbmError::MissingInstance;
        assert!(err.to_string().contains("IBM_INSTANCE"));
    }

    #[test]
    fn test_api_error_display() {
        let err = IbmError::ApiError {
            status: 500,
            message: "internal".into(),
        };
        assert_eq!(err.to_string(), "IBM Quantum API error (500): internal");
    }

    #[test]
    fn test_backend_unavailable_display() {
        let err = IbmError::BackendUnavailable("ibm_nowhere".into());
        assert_eq!(err.to_string(), "Backend not available: ibm_nowhere");
    }

    // -- Source chain tests --

    #[test]
    fn test_invalid_target_keeps_source() {
        let err = IbmError::InvalidTarget {
            backend: "ibm_torino".into(),
            source: qforge_compile::CompileError::InvalidTarget("self loop on qubit 3".into()),
        };
        let source = err.source().map(ToString::to_string).unwrap_or_default();
        assert!(source.contains("self loop on qubit 3"));
    }

    // -- Classification tests --

    #[test]
    fn test_auth_errors() {
        assert!(IbmError::MissingApiKey.is_auth_error());
        assert!(IbmError::IamTokenExchange("denied".into()).is_auth_error());
        assert!(!IbmError::BackendUnavailable("x".into()).is_auth_error());
    }
}

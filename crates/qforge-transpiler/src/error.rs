//! Error types for the transpile pipeline and the HTTP edge.

use std::error::Error as _;
use std::fmt::Write as _;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use qforge_adapter_ibm::IbmError;
use qforge_compile::CompileError;
use qforge_ir::IrError;

/// A failure in one stage of the transpile pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TranspileError {
    #[error("Failed to decode circuit batch: {0}")]
    Decode(#[source] IrError),

    #[error("Failed to decode circuit batch: expected a base64 string, got {0}")]
    PayloadType(&'static str),

    #[error("Failed to resolve backend '{backend}': {source}")]
    Registry {
        backend: String,
        #[source]
        source: IbmError,
    },

    #[error("Transpilation failed: {0}")]
    Compile(#[source] CompileError),

    #[error("Failed to encode compiled circuits: {0}")]
    Encode(#[source] IrError),

    #[error("Simulator request failed: {0}")]
    Executor(#[source] reqwest::Error),

    #[error("Simulator returned invalid JSON: {0}")]
    ExecutorResponse(#[source] serde_json::Error),

    #[error("Compilation task failed: {0}")]
    Join(#[source] tokio::task::JoinError),

    /// The executor answered with a non-200 status.
    #[error("Simulator failed: {body}")]
    SimulatorFailed { status: u16, body: String },
}

impl TranspileError {
    /// Pipeline stage the error belongs to.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Decode(_) | Self::PayloadType(_) => "decode",
            Self::Registry { .. } => "registry",
            Self::Compile(_) | Self::Join(_) => "compile",
            Self::Encode(_) => "encode",
            Self::Executor(_) | Self::ExecutorResponse(_) | Self::SimulatorFailed { .. } => {
                "execute"
            }
        }
    }

    /// Render the error and its causes, one per line.
    pub fn traceback(&self) -> String {
        let mut out = format!("{} stage: {self}", self.stage());
        let mut source = self.source();
        while let Some(cause) = source {
            let _ = write!(out, "\nCaused by: {cause}");
            source = cause.source();
        }
        out
    }
}

/// Error returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Internal {
        message: String,
        traceback: Option<String>,
    },
}

impl ApiError {
    /// Collapse a pipeline failure into a 500. Downstream execution
    /// failures never carry a traceback.
    pub fn from_transpile(err: &TranspileError, expose_traceback: bool) -> Self {
        let traceback = match err {
            TranspileError::SimulatorFailed { .. } => None,
            _ => expose_traceback.then(|| err.traceback()),
        };
        ApiError::Internal {
            message: err.to_string(),
            traceback,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    traceback: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, traceback) = match self {
            ApiError::BadRequest(error) => (StatusCode::BAD_REQUEST, error, None),
            ApiError::Internal { message, traceback } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, traceback)
            }
        };

        (status, Json(ErrorResponse { error, traceback })).into_response()
    }
}

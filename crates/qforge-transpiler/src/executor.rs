//! Client for the downstream executor.

use std::time::Duration;

use axum::body::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::IgnoredAny;
use tracing::{info, warn};

use crate::dto::ExecuteRequest;
use crate::error::TranspileError;

/// Posts compiled batches to `{base}/execute`.
#[derive(Debug, Clone)]
pub struct ExecutorClient {
    client: Client,
    url: String,
}

impl ExecutorClient {
    /// Create a client for `url` (the full execute endpoint).
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submit a compiled batch.
    ///
    /// A 200 yields the executor's JSON body untouched. Any other status
    /// becomes [`TranspileError::SimulatorFailed`] carrying the body text.
    pub async fn execute(&self, request: &ExecuteRequest) -> Result<Bytes, TranspileError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(TranspileError::Executor)?;

        let status = response.status();
        let body = response.bytes().await.map_err(TranspileError::Executor)?;

        if status != StatusCode::OK {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(status = status.as_u16(), "Simulator rejected the batch");
            return Err(TranspileError::SimulatorFailed {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_slice::<IgnoredAny>(&body).map_err(TranspileError::ExecutorResponse)?;
        info!("simulation is complete");
        Ok(body)
    }
}

//! Transpile endpoint.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::error;

use crate::dto::TranspileRequest;
use crate::error::ApiError;
use crate::pipeline;
use crate::state::AppState;

/// POST /transpile - Compile a circuit batch for a backend and forward it
/// to the executor.
pub async fn transpile(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let request = TranspileRequest::from_json(body);
    let Some(payload) = request.circuits() else {
        return Err(ApiError::BadRequest("No circuits provided".to_string()));
    };

    match pipeline::run(&state, payload, request.shots(), &request.backend()).await {
        Ok(body) => Ok(([(header::CONTENT_TYPE, "application/json")], body)),
        Err(err) => {
            error!(stage = err.stage(), "{err}");
            Err(ApiError::from_transpile(&err, state.config.expose_traceback))
        }
    }
}

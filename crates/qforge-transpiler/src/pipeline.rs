//! The transpile pipeline: decode, resolve, compile, encode, execute.

use axum::body::Bytes;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use qforge_compile::{Target, generate_preset_pass_manager};
use qforge_ir::CircuitBatch;

use crate::dto::ExecuteRequest;
use crate::error::TranspileError;
use crate::state::AppState;

/// Optimization level every batch is compiled at.
pub const OPTIMIZATION_LEVEL: u8 = 3;

/// Decode the `circuits_qpy` field of a request.
pub fn decode_payload(payload: &Value) -> Result<CircuitBatch, TranspileError> {
    let kind = match payload {
        Value::String(encoded) => return decode_batch(encoded),
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Err(TranspileError::PayloadType(kind))
}

/// Decode a base64 circuit batch.
pub fn decode_batch(payload: &str) -> Result<CircuitBatch, TranspileError> {
    CircuitBatch::from_base64(payload).map_err(TranspileError::Decode)
}

/// Compile every circuit of a batch for `target`, preserving order.
pub fn compile_batch(batch: CircuitBatch, target: &Target) -> Result<CircuitBatch, TranspileError> {
    generate_preset_pass_manager(OPTIMIZATION_LEVEL, target)
        .and_then(|pm| pm.run_batch(batch))
        .map_err(TranspileError::Compile)
}

/// Encode a compiled batch for the executor.
pub fn encode_batch(batch: &CircuitBatch) -> Result<String, TranspileError> {
    batch.to_base64().map_err(TranspileError::Encode)
}

/// Run one request through the whole pipeline and return the executor's
/// response body.
#[instrument(skip(state, payload), fields(request_id = %Uuid::new_v4()))]
pub async fn run(
    state: &AppState,
    payload: &Value,
    shots: Value,
    backend: &str,
) -> Result<Bytes, TranspileError> {
    let batch = decode_payload(payload)?;
    info!(circuits = batch.len(), "Decoded circuit batch");

    let target = state
        .registry
        .resolve(backend)
        .await
        .map_err(|source| TranspileError::Registry {
            backend: backend.to_string(),
            source,
        })?;
    info!(
        num_qubits = target.num_qubits(),
        calibrated = target.calibration().is_some(),
        "Resolved backend target"
    );

    let compiled = tokio::task::spawn_blocking(move || compile_batch(batch, &target))
        .await
        .map_err(TranspileError::Join)??;

    let request = ExecuteRequest {
        isa_circuits_b64: encode_batch(&compiled)?,
        shots,
        backend_name: backend.to_string(),
    };
    state.executor.execute(&request).await
}

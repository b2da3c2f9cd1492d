//! Request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shots forwarded when the request does not name any.
pub const DEFAULT_SHOTS: u64 = 1024;

/// Backend resolved when the request does not name one.
pub const DEFAULT_BACKEND: &str = "ibm_torino";

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" if responding.
    pub status: String,
    /// Service identifier.
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "transpiler".to_string(),
        }
    }
}

/// Body of `POST /transpile`.
///
/// Fields are kept as raw JSON: nothing beyond the presence of circuits is
/// validated here. `null` counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranspileRequest {
    /// Base64-encoded circuit batch.
    #[serde(default)]
    pub circuits_qpy: Option<Value>,
    /// Number of shots for the executor.
    #[serde(default)]
    pub shots: Option<Value>,
    /// Backend to compile for.
    #[serde(default)]
    pub backend: Option<Value>,
}

impl TranspileRequest {
    /// Read the known fields of a JSON body. Anything but an object has
    /// none of them.
    pub fn from_json(body: Value) -> Self {
        if !body.is_object() {
            return Self::default();
        }
        serde_json::from_value(body).unwrap_or_default()
    }

    /// The circuit payload, unless it is missing or empty.
    ///
    /// `false`, `0`, `""`, `[]` and `{}` all count as empty.
    pub fn circuits(&self) -> Option<&Value> {
        self.circuits_qpy.as_ref().filter(|value| !is_empty(value))
    }

    /// Requested shots as sent, or [`DEFAULT_SHOTS`].
    pub fn shots(&self) -> Value {
        self.shots.clone().unwrap_or_else(|| DEFAULT_SHOTS.into())
    }

    /// Requested backend, or [`DEFAULT_BACKEND`]. A non-string value is
    /// looked up by its JSON text.
    pub fn backend(&self) -> String {
        match &self.backend {
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => DEFAULT_BACKEND.to_string(),
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Body sent to the executor's `/execute` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Base64-encoded compiled batch.
    pub isa_circuits_b64: String,
    /// Number of shots, forwarded as received.
    pub shots: Value,
    /// Backend the circuits were compiled for.
    pub backend_name: String,
}

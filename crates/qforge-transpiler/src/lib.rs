//! qforge transpiler service.
//!
//! An HTTP service that takes a batch of circuits, compiles it for a named
//! IBM Quantum backend and forwards the hardware-native result to a
//! downstream executor.
//!
//! - `GET /health` reports liveness.
//! - `POST /transpile` decodes the batch, resolves the backend target from
//!   the IBM Quantum Platform, compiles at optimization level 3 and posts
//!   `{isa_circuits_b64, shots, backend_name}` to `{SIMULATOR_SERVICE_URL}/execute`.
//!   The executor's JSON answer is relayed as is.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qforge_transpiler::{AppState, TranspilerConfig, create_router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TranspilerConfig::load()?;
//!     let address = config.address;
//!     let app = create_router(Arc::new(AppState::new(config)?));
//!     let listener = tokio::net::TcpListener::bind(address).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod registry;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::{ConfigError, TranspilerConfig};
pub use dto::{ExecuteRequest, HealthResponse, TranspileRequest};
pub use error::{ApiError, TranspileError};
pub use executor::ExecutorClient;
pub use registry::{IbmTargetRegistry, TargetRegistry};
pub use server::create_router;
pub use state::AppState;

//! IBM Quantum Platform target registry.
//!
//! Opens an authenticated session against the IBM Quantum Cloud API and
//! resolves backend names into [`qforge_compile::Target`]s: native gates,
//! connectivity and, when the device publishes it, calibration data.
//!
//! # Example
//!
//! ```no_run
//! use qforge_adapter_ibm::{RuntimeService, RuntimeServiceOptions};
//!
//! # async fn example() -> Result<(), qforge_adapter_ibm::IbmError> {
//! let options = RuntimeServiceOptions::new(
//!     std::env::var("IBM_API_KEY").ok(),
//!     std::env::var("IBM_INSTANCE").ok(),
//! );
//! let service = RuntimeService::connect(&options).await?;
//! let target = service.target("ibm_torino").await?;
//! println!("{} qubits", target.num_qubits());
//! # Ok(())
//! # }
//! ```

mod api;
mod backend;
mod error;

pub use api::{CHANNEL, DEFAULT_ENDPOINT, DEFAULT_IAM_URL, RuntimeService, RuntimeServiceOptions};
pub use backend::{BackendConfiguration, BackendProperties, GateProperties, Nduv, build_target};
pub use error::{IbmError, IbmResult};

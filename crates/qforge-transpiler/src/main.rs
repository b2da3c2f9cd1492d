//! qforge transpiler binary entry point.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use qforge_transpiler::telemetry::init_tracing;
use qforge_transpiler::{AppState, TranspilerConfig, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TranspilerConfig::load().context("Invalid configuration")?;
    init_tracing(config.log_format).context("Failed to initialize tracing")?;

    if config.ibm_api_key.is_none() || config.ibm_instance.is_none() {
        warn!("IBM_API_KEY or IBM_INSTANCE is not set; transpile requests will fail");
    }
    info!(?config, "Loaded configuration");

    let address = config.address;
    let state = Arc::new(AppState::new(config).context("Failed to build executor client")?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Transpiler service listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Transpiler service shut down");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}

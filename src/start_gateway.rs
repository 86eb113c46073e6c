//! Startup helpers for the memory gateway server.

use std::process::ExitCode;

use crate::memory::core::config::Settings;
use crate::server::{self, AppState};

/// Install the global tracing subscriber (`RUST_LOG` aware, INFO by default).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
}

/// Run the server until Ctrl-C, then close the index clients.
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();

    tracing::info!("Starting memory gateway v{}", env!("CARGO_PKG_VERSION"));

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };
    let port = settings.port;

    // The blocking classifier client must be built and dropped outside the runtime.
    let state = match AppState::new(settings) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let served = rt.block_on(async {
        let served =
            server::run_server_with_shutdown(std::sync::Arc::clone(&state), port, shutdown_signal())
                .await;
        if let Err(e) = state.close().await {
            tracing::warn!("Failed to close index clients: {e}");
        }
        served
    });
    drop(rt);

    match served {
        Ok(()) => {
            tracing::info!("Memory gateway stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Server error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Resolve when Ctrl-C is received.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

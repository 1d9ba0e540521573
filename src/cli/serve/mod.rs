//! Serve command - runs the HTTP API server

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::api::{create_router_with_state, AppState};
use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Run the API server
///
/// The cache and store opened at startup are released on every exit path,
/// including a failure to bind the listener.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    let state = crate::create_app_state_with_config(&config)
        .await
        .inspect_err(|e| error!(error = %e, "Startup failed"))?;

    let result = serve(&config, state.clone()).await;

    if let Err(e) = state.question_service.shutdown().await {
        error!(error = %e, "Failed to release resources");
    }

    info!("Server shutdown complete");
    result
}

async fn serve(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    state.question_service.purge_cache().await;

    let addr = build_socket_addr(config)?;
    let listener = TcpListener::bind(addr).await?;
    info!("Starting server on {}", addr);

    let app = create_router_with_state(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

//! Faultbird HTTP Server
//!
//! Main entry point for the mock server.

use std::time::Duration;

use anyhow::Context;
use infrastructure::{AppConfig, LogFormat, init_telemetry};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_telemetry(
        &config.telemetry,
        LogFormat::from_setting(&config.server.log_format),
    )?;
    install_panic_hook();

    info!("Faultbird v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = config.server.port,
        environment = %config.environment.unwrap_or_default(),
        "Configuration loaded"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let state = AppState::from_config(config).await?;
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    let (stop_tx, mut stop_rx) = watch::channel(());
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = stop_tx.send(());
    });

    tokio::select! {
        result = server.into_future() => result?,
        () = async {
            let _ = stop_rx.changed().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!(?shutdown_timeout, "Connections still open after shutdown timeout, exiting");
        }
    }

    info!("Server shutdown complete");

    Ok(())
}

/// Log panics through tracing and exit, nothing restarts a broken process
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic| {
        let location = panic
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        error!(%location, panic = %panic, "Unhandled panic, terminating");
        std::process::exit(1);
    }));
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

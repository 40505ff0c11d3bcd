mod app_system;
mod clients;
mod domain;
mod error;
mod event_queue;
mod ingress;
mod product_store;
mod signal;
mod store_framework;
mod worker_pool;

#[cfg(test)]
mod mock_framework;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::app_system::{setup_tracing, AppConfig, DrainOutcome, PipelineSystem};
use crate::error::AppError;
use crate::ingress::IngressState;
use crate::signal::{termination_signal, CancelSignal};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = AppConfig::parse();
    let system = PipelineSystem::start(config.pipeline())?;

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let app = ingress::router(IngressState {
        client: system.client(),
        phase: system.subscribe_phase(),
    });

    let ingress_stop = CancelSignal::new();
    let mut stop_listener = ingress_stop.subscribe();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop_listener.cancelled().await })
            .await
    });

    info!(addr = %config.listen_addr(), "HTTP server listening");

    let server_exit = tokio::select! {
        _ = termination_signal() => None,
        result = &mut server => Some(result),
    };
    let (early_error, server) = match server_exit {
        None => (None, Some(server)),
        Some(result) => (server_error(result), None),
    };

    // A second signal stops the workers without waiting for buffered events.
    let cancel = system.cancel_signal();
    let force = tokio::spawn(async move {
        termination_signal().await;
        warn!("Second termination signal, cancelling workers");
        cancel.cancel();
    });

    let server_timeout = config.server_shutdown_timeout();
    let outcome = system
        .shutdown(async move {
            ingress_stop.cancel();
            let Some(server) = server else { return };
            match tokio::time::timeout(server_timeout, server).await {
                Ok(result) => {
                    if let Some(e) = server_error(result) {
                        error!(error = %e, "HTTP server failed while stopping");
                    }
                }
                Err(_) => warn!(
                    timeout_ms = server_timeout.as_millis() as u64,
                    "HTTP server did not stop in time"
                ),
            }
        })
        .await;
    force.abort();

    match outcome {
        DrainOutcome::Drained => info!("Graceful shutdown complete"),
        DrainOutcome::TimedOut { remaining } => {
            info!(remaining, "Shutdown complete after drain timeout")
        }
    }

    match early_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Logs how the server task ended and hands back its I/O error, if any.
fn server_error(result: Result<std::io::Result<()>, JoinError>) -> Option<std::io::Error> {
    match result {
        Ok(Ok(())) => {
            info!("HTTP server stopped");
            None
        }
        Ok(Err(e)) => {
            error!(error = %e, "HTTP server failed");
            Some(e)
        }
        Err(e) => {
            error!(error = ?e, "HTTP server task failed");
            None
        }
    }
}

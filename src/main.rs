use std::sync::Arc;

use log::{error, info};
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::watch;

mod collector;
mod error;
mod metrics;
mod runtime;
mod server;
mod types;

use collector::{COLLECT_INTERVAL, HealthCollector};
use metrics::HealthMetrics;
use runtime::DockerRuntime;

#[tokio::main]
async fn main() {
    env_logger::init();

    info!("Starting PulseBox container health exporter");

    let runtime = match DockerRuntime::connect() {
        Ok(runtime) => Arc::new(runtime),
        Err(e) => {
            error!("Failed to connect to Docker daemon: {e}");
            std::process::exit(1);
        }
    };

    let metrics = match HealthMetrics::new() {
        Ok(metrics) => Arc::new(metrics),
        Err(e) => {
            error!("Unable to register metrics: {e}");
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let collector = HealthCollector::new(runtime, Arc::clone(&metrics));
    let collector_task = tokio::spawn(collector.run(COLLECT_INTERVAL, shutdown_rx.clone()));

    tokio::spawn(shutdown_on_signal(shutdown_tx));

    if let Err(e) = server::serve(metrics, shutdown_rx).await {
        error!("HTTP server failed: {e}");
        std::process::exit(1);
    }

    let _ = collector_task.await;
    info!("Exporter stopped");
}

/// Flip the shutdown channel on SIGINT or SIGTERM so the collection loop and
/// the HTTP server drain cleanly.
async fn shutdown_on_signal(shutdown_tx: watch::Sender<bool>) {
    let mut sigterm = signal(SignalKind::terminate()).expect("Unable to install SIGTERM handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT, shutting down"),
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
    }

    let _ = shutdown_tx.send(true);
}

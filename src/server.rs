//! HTTP exposition endpoint.
//!
//! Serves the current gauge state on `/metrics` and a landing page on `/`,
//! decoupled from the collection timer: a scrape always reflects the most
//! recently completed collection cycle.

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::Html,
    routing::get,
};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::ExporterError;
use crate::metrics::HealthMetrics;

/// Port the exposition endpoint listens on.
pub const METRICS_PORT: u16 = 8037;

const INDEX_HTML: &str = r#"<html>
<head><title>PulseBox - Container Health Exporter</title></head>
<body>
    <h1>PulseBox - Container Health Exporter</h1>
    <p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

fn router(metrics: Arc<HealthMetrics>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/metrics", get(serve_metrics))
        .with_state(metrics)
}

/// Bind the listener and serve until the shutdown signal flips.
///
/// A bind failure is returned to the caller; it is fatal for the process.
pub async fn serve(
    metrics: Arc<HealthMetrics>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), ExporterError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], METRICS_PORT));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {addr}");

    axum::serve(listener, router(metrics))
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn serve_metrics(
    State(metrics): State<Arc<HealthMetrics>>,
) -> Result<([(header::HeaderName, &'static str); 1], String), (StatusCode, String)> {
    let body = metrics.gather_text().map_err(|e| {
        error!("Failed to encode metrics: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics".to_string(),
        )
    })?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

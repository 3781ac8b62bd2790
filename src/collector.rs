//! The collection loop: enumerate running containers, inspect each for
//! health-check state, and republish the result as gauges.

use std::sync::Arc;
use std::time::Duration;

use bollard::models::{ContainerInspectResponse, ContainerSummary, Health};
use log::{error, info};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::metrics::HealthMetrics;
use crate::runtime::ContainerRuntime;
use crate::types::{ContainerObservation, HealthStatus};

/// How often a collection pass runs.
pub const COLLECT_INTERVAL: Duration = Duration::from_secs(30);

/// Docker ids are published in their 12-character short form.
const SHORT_ID_LEN: usize = 12;

pub struct HealthCollector<R> {
    runtime: Arc<R>,
    metrics: Arc<HealthMetrics>,
}

impl<R: ContainerRuntime> HealthCollector<R> {
    pub fn new(runtime: Arc<R>, metrics: Arc<HealthMetrics>) -> Self {
        Self { runtime, metrics }
    }

    /// Run one full collection pass.
    ///
    /// A listing failure aborts the pass and leaves the previously published
    /// cycle in place; an inspection failure skips that container only.
    /// Containers are inspected one at a time, in list order.
    pub async fn collect(&self) {
        let containers = match self.runtime.list_running().await {
            Ok(containers) => containers,
            Err(e) => {
                error!("Error listing containers: {e}");
                return;
            }
        };

        let mut observations = Vec::with_capacity(containers.len());
        for container in &containers {
            let id = container.id.as_deref().unwrap_or_default();
            let inspection = match self.runtime.inspect(id).await {
                Ok(inspection) => inspection,
                Err(e) => {
                    error!("Error inspecting container {id}: {e}");
                    continue;
                }
            };

            let obs = observe(container, &inspection);
            info!(
                "Container: {}, Health: {}, Duration: {:.2}s",
                obs.name,
                obs.health_status.as_ref(),
                obs.check_duration_seconds.unwrap_or(0.0),
            );
            observations.push(obs);
        }

        self.metrics.publish_cycle(&observations);
    }

    /// Collect once immediately, then once per interval until shutdown.
    pub async fn run(self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately, giving the startup pass.
        // A pass that overruns the interval skips late ticks rather than
        // bursting to catch up, so cycles never overlap.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.collect().await,
                _ = shutdown.changed() => {
                    info!("Collection loop stopped");
                    return;
                }
            }
        }
    }
}

/// Fold one container's inspection data into an observation.
fn observe(summary: &ContainerSummary, inspection: &ContainerInspectResponse) -> ContainerObservation {
    let id = summary.id.as_deref().unwrap_or_default();
    let id = id.get(..SHORT_ID_LEN).unwrap_or(id).to_string();

    // Docker prefixes container names with a slash internally.
    let name = inspection
        .name
        .as_deref()
        .map(|name| name.strip_prefix('/').unwrap_or(name))
        .unwrap_or_default()
        .to_string();

    let image = inspection
        .config
        .as_ref()
        .and_then(|config| config.image.clone())
        .or_else(|| summary.image.clone())
        .unwrap_or_default();

    let health = inspection.state.as_ref().and_then(|state| state.health.as_ref());

    let health_status = health
        .and_then(|health| health.status)
        .map(HealthStatus::from)
        .unwrap_or(HealthStatus::None);

    let check_duration_seconds = health.and_then(last_check_duration);

    ContainerObservation {
        id,
        name,
        image,
        health_status,
        check_duration_seconds,
    }
}

/// Seconds taken by the most recent completed health check.
///
/// Docker reports a zero end timestamp for a check still in flight; those,
/// and entries whose end does not come strictly after the start, yield no
/// duration.
fn last_check_duration(health: &Health) -> Option<f64> {
    let last = health.log.as_ref()?.last()?;
    let start = last.start?;
    let end = last.end?;

    if end.timestamp() <= 0 || end <= start {
        return None;
    }

    Some((end - start).num_milliseconds() as f64 / 1000.0)
}

//! Prometheus gauge families for container health.
//!
//! The registry is owned here rather than registered into the crate's global
//! default registry, so the exporter's HTTP handler and the collector share
//! one explicit instance.

use std::sync::Mutex;

use prometheus::{GaugeVec, Opts, Registry, TextEncoder};

use crate::error::ExporterError;
use crate::types::{ContainerObservation, health_status_value};

pub struct HealthMetrics {
    registry: Registry,
    status: GaugeVec,
    check_duration: GaugeVec,
    /// Serializes cycle publication against scrape encoding, so a scrape
    /// sees either the previous complete cycle or the next one.
    cycle_lock: Mutex<()>,
}

impl HealthMetrics {
    pub fn new() -> Result<Self, ExporterError> {
        let status = GaugeVec::new(
            Opts::new(
                "container_health_status",
                "Health status of containers (0=unhealthy, 1=healthy, 2=starting, 3=unset)",
            ),
            &["container_id", "container_name", "image"],
        )?;

        let check_duration = GaugeVec::new(
            Opts::new(
                "container_health_check_duration_seconds",
                "Duration of the last health check in seconds",
            ),
            &["container_id", "container_name"],
        )?;

        let registry = Registry::new();
        registry.register(Box::new(status.clone()))?;
        registry.register(Box::new(check_duration.clone()))?;

        Ok(Self {
            registry,
            status,
            check_duration,
            cycle_lock: Mutex::new(()),
        })
    }

    /// Replace the published state with one cycle's observations.
    ///
    /// Both families are cleared first, so containers that stopped since the
    /// previous cycle drop out instead of lingering with stale values. The
    /// duration gauge only carries containers with a completed check.
    pub fn publish_cycle(&self, observations: &[ContainerObservation]) {
        let _guard = self.cycle_lock.lock().expect("Poisoned metrics lock");

        self.status.reset();
        self.check_duration.reset();

        for obs in observations {
            self.status
                .with_label_values(&[obs.id.as_str(), obs.name.as_str(), obs.image.as_str()])
                .set(health_status_value(obs.health_status.as_ref()));

            if let Some(duration) = obs.check_duration_seconds {
                if duration > 0.0 {
                    self.check_duration
                        .with_label_values(&[obs.id.as_str(), obs.name.as_str()])
                        .set(duration);
                }
            }
        }
    }

    /// Encode the current gauge state in the Prometheus text format.
    pub fn gather_text(&self) -> Result<String, ExporterError> {
        let _guard = self.cycle_lock.lock().expect("Poisoned metrics lock");

        let encoder = TextEncoder::new();
        Ok(encoder.encode_to_string(&self.registry.gather())?)
    }
}

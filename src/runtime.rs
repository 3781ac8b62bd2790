//! Docker client module using bollard.
//!
//! The daemon connection is derived from the ambient environment
//! (`DOCKER_HOST` when set, the platform-local socket otherwise), so the
//! exporter needs no connection configuration of its own.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{ContainerInspectResponse, ContainerSummary};
use bollard::query_parameters::{
    InspectContainerOptions, InspectContainerOptionsBuilder, ListContainersOptions,
    ListContainersOptionsBuilder,
};

use crate::error::ExporterError;

/// The two operations the collector needs from a container runtime.
///
/// Implemented by [`DockerRuntime`] against the real daemon; tests substitute
/// a scripted implementation.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List containers currently in the running state.
    async fn list_running(&self) -> Result<Vec<ContainerSummary>, ExporterError>;

    /// Fetch detailed inspection data for one container.
    async fn inspect(&self, id: &str) -> Result<ContainerInspectResponse, ExporterError>;
}

pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    pub fn connect() -> Result<Self, ExporterError> {
        let docker = Docker::connect_with_defaults()?;
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_running(&self) -> Result<Vec<ContainerSummary>, ExporterError> {
        let mut filters = HashMap::new();
        filters.insert("status", vec!["running"]);

        let options: ListContainersOptions =
            ListContainersOptionsBuilder::new().filters(&filters).build();

        Ok(self.docker.list_containers(Some(options)).await?)
    }

    async fn inspect(&self, id: &str) -> Result<ContainerInspectResponse, ExporterError> {
        let options: InspectContainerOptions = InspectContainerOptionsBuilder::new().build();

        Ok(self.docker.inspect_container(id, Some(options)).await?)
    }
}

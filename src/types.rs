use bollard::models::HealthStatusEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Starting,
    None,
}

impl AsRef<str> for HealthStatus {
    fn as_ref(&self) -> &str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::Starting => "starting",
            Self::None => "none",
        }
    }
}

impl From<HealthStatusEnum> for HealthStatus {
    fn from(status: HealthStatusEnum) -> Self {
        match status {
            HealthStatusEnum::HEALTHY => Self::Healthy,
            HealthStatusEnum::UNHEALTHY => Self::Unhealthy,
            HealthStatusEnum::STARTING => Self::Starting,
            HealthStatusEnum::EMPTY | HealthStatusEnum::NONE => Self::None,
        }
    }
}

/// One container's health state as seen in a single collection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerObservation {
    /// Docker id in its 12-character short form.
    pub id: String,
    pub name: String,
    pub image: String,
    pub health_status: HealthStatus,
    /// Seconds taken by the last completed health check, when one exists.
    pub check_duration_seconds: Option<f64>,
}

/// Numeric gauge value for a health status string.
///
/// Total over all inputs: the three known statuses map to their fixed wire
/// values, and anything else (an empty string, "none", or a status Docker
/// defines later) reports as unset (3).
pub fn health_status_value(status: &str) -> f64 {
    match status {
        "healthy" => 1.0,
        "unhealthy" => 0.0,
        "starting" => 2.0,
        _ => 3.0,
    }
}

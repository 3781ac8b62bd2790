#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    #[error("Docker API error: {0}")]
    DockerApi(#[from] bollard::errors::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

use crate::report::ReportError;
use crate::validate::ValidationErrors;
use qstress::LoadTestError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Unable to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration:\n{0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    LoadTest(#[from] LoadTestError),

    #[error("Failed to save results: {0}")]
    Report(#[from] ReportError),

    #[error("Failed to install the metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

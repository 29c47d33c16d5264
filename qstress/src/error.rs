use std::time::Duration;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a connection provider.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("{0}")]
    Driver(BoxError),

    #[error("{0}")]
    Message(String),

    #[error("Connection timed out after {}", humantime::format_duration(*.0))]
    Timeout(Duration),
}

impl ConnectionError {
    pub fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Driver(Box::new(err))
    }

    pub fn msg(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

/// Why a single query attempt failed. Never escapes a worker.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Query(#[from] ConnectionError),

    #[error("Query timed out after {}", humantime::format_duration(*.0))]
    Timeout(Duration),

    #[error("Query was cancelled")]
    Cancelled,
}

/// Run-level failures. No results are returned alongside these.
#[derive(Debug, Error)]
pub enum LoadTestError {
    #[error("Unable to connect to the target: {0}")]
    Preflight(#[source] ConnectionError),

    #[error("Worker {worker_id} was unable to open its connection: {source}")]
    WorkerConnect {
        worker_id: usize,
        #[source]
        source: ConnectionError,
    },

    #[error("Worker {worker_id} panicked. This is a bug in qstress or the connection provider.")]
    WorkerPanicked { worker_id: usize },
}

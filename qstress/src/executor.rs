use crate::connection::Connection;
use crate::error::AttemptError;
#[cfg(feature = "metrics")]
use qstress_core::QUERY_LABELS;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
#[allow(unused)]
use tracing::{debug, error, trace, warn};

/// Outcome of one request/response cycle. Latency is measured for failures too.
#[derive(Debug)]
pub struct ExecutionOutcome {
    pub elapsed: Duration,
    pub result: Result<u64, AttemptError>,
}

impl ExecutionOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error_message(&self) -> Option<String> {
        self.result.as_ref().err().map(ToString::to_string)
    }
}

/// Send `query` over `connection` and drain the response.
///
/// Returns early with [`AttemptError::Cancelled`] if `cancel` fires, and with
/// [`AttemptError::Timeout`] once `timeout` elapses. Never retries.
pub async fn execute<C>(
    connection: &mut C,
    query: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> ExecutionOutcome
where
    C: Connection,
{
    let start = Instant::now();
    let result = tokio::select! {
        biased;

        _ = cancel.cancelled() => Err(AttemptError::Cancelled),
        res = tokio::time::timeout(timeout, connection.execute(query)) => match res {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(err)) => Err(AttemptError::Query(err)),
            Err(_) => Err(AttemptError::Timeout(timeout)),
        },
    };
    let elapsed = start.elapsed();

    match &result {
        Ok(rows) => trace!("Query returned {rows} rows in {elapsed:?}"),
        Err(err) => debug!("Query failed after {elapsed:?}: {err}"),
    }

    #[cfg(feature = "metrics")]
    {
        metrics::histogram!(QUERY_LABELS.latency).record(elapsed.as_secs_f64());
        if result.is_ok() {
            metrics::counter!(QUERY_LABELS.success).increment(1);
        } else {
            metrics::counter!(QUERY_LABELS.error).increment(1);
        }
    }

    ExecutionOutcome { elapsed, result }
}

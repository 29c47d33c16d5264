use crate::connection::{connect_within, Connection, Connector};
use crate::countdown::Countdown;
use crate::error::ConnectionError;
use crate::executor::execute;
use crate::store::ResultStore;
use qstress_core::{AttemptStart, QueryTemplate};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Per-worker tallies, logged when the worker exits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorkerStats {
    pub attempts: u64,
    pub errors: u64,
}

/// One load generator with its own dedicated connection.
pub(crate) struct Worker<C> {
    pub id: usize,
    pub connector: Arc<C>,
    pub template: Arc<QueryTemplate>,
    pub cardinality: u64,
    pub countdown: Countdown,
    pub query_timeout: Duration,
    pub connect_timeout: Duration,
    pub cancel: CancellationToken,
    pub store: ResultStore,
}

impl<C> Worker<C>
where
    C: Connector + Send + Sync + 'static,
{
    /// Issue attempts until the deadline passes or the run is cancelled.
    ///
    /// Only failing to open the worker's connection is an error; every attempt failure becomes
    /// an error record and the loop carries on.
    pub async fn run(self) -> Result<WorkerStats, ConnectionError> {
        let mut stats = WorkerStats::default();

        let mut connection = tokio::select! {
            biased;

            _ = self.cancel.cancelled() => {
                debug!("Cancelled before the connection was opened.");
                return Ok(stats);
            }
            _ = tokio::time::sleep_until(self.countdown.deadline()) => {
                warn!("Run ended before the connection was opened.");
                return Ok(stats);
            }
            res = connect_within(&*self.connector, self.connect_timeout) => res?,
        };
        trace!("Connection open.");

        let mut counter = 0;
        while !self.countdown.is_expired() && !self.cancel.is_cancelled() {
            let start = AttemptStart::now(self.id, counter);
            let query = self.template.render(counter);

            let outcome = execute(&mut connection, &query, self.query_timeout, &self.cancel).await;

            stats.attempts += 1;
            if !outcome.is_ok() {
                stats.errors += 1;
            }
            self.store
                .push(start.finish(outcome.elapsed, outcome.error_message()));

            counter = next_counter(counter, self.cardinality);
        }

        if let Err(err) = connection.close().await {
            warn!("Error closing connection: {err}");
        }

        debug!(
            "Worker finished after {} attempts ({} errors).",
            stats.attempts, stats.errors
        );
        Ok(stats)
    }
}

/// Advance the attempt counter, wrapping at `cardinality`.
///
/// Templates without placeholders (`cardinality == 1`) keep the counter at zero.
pub(crate) fn next_counter(counter: u64, cardinality: u64) -> u64 {
    if cardinality <= 1 {
        return counter;
    }

    let next = counter + 1;
    if next >= cardinality {
        0
    } else {
        next
    }
}

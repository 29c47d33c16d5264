use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use qstress::{Connection, ConnectionError, Connector};
use rand_distr::{Distribution, SkewNormal};
use std::{
    num::NonZeroU32,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};
use tracing::debug;

pub mod prelude {
    pub use super::{Latency, MockDatabase};
}

/// How long each query takes to answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Latency {
    Fixed(Duration),
    /// Skew-normal jitter around `mean`. Samples are clamped at zero.
    SkewNormal {
        mean: Duration,
        std_dev: Duration,
        shape: f64,
    },
}

impl Latency {
    fn sample(&self) -> Duration {
        match *self {
            Latency::Fixed(latency) => latency,
            Latency::SkewNormal {
                mean,
                std_dev,
                shape,
            } => match SkewNormal::new(mean.as_secs_f64(), std_dev.as_secs_f64(), shape) {
                Ok(distr) => {
                    let secs: f64 = distr.sample(&mut rand::thread_rng());
                    Duration::from_secs_f64(secs.max(0.))
                }
                Err(_) => mean,
            },
        }
    }
}

#[derive(Default)]
struct Counters {
    opened: AtomicU64,
    open: AtomicU64,
    executed: AtomicU64,
    log: Mutex<Vec<String>>,
}

/// An in-process stand-in for a database server.
///
/// Clones share their counters and query log, so a test can hand one clone to the load test
/// and inspect another afterwards.
#[derive(Clone)]
pub struct MockDatabase {
    latency: Latency,
    refuse_connections: bool,
    failing: Vec<String>,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    counters: Arc<Counters>,
}

impl MockDatabase {
    pub fn new(latency: Latency) -> Self {
        Self {
            latency,
            refuse_connections: false,
            failing: vec![],
            limiter: None,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self::new(Latency::Fixed(delay))
    }

    /// Refuse every connection attempt.
    pub fn fail_connect(mut self) -> Self {
        self.refuse_connections = true;
        self
    }

    /// Fail any query whose text contains `needle`.
    pub fn fail_queries_containing(mut self, needle: impl Into<String>) -> Self {
        self.failing.push(needle.into());
        self
    }

    /// Fail queries beyond `max_qps` across every connection.
    pub fn limited(mut self, max_qps: NonZeroU32) -> Self {
        self.limiter = Some(Arc::new(RateLimiter::direct(Quota::per_second(max_qps))));
        self
    }

    pub fn connections_opened(&self) -> u64 {
        self.counters.opened.load(Ordering::Relaxed)
    }

    pub fn connections_open(&self) -> u64 {
        self.counters.open.load(Ordering::Relaxed)
    }

    pub fn queries_executed(&self) -> u64 {
        self.counters.executed.load(Ordering::Relaxed)
    }

    /// Every query text received so far, in arrival order.
    pub fn query_log(&self) -> Vec<String> {
        self.counters
            .log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Connector for MockDatabase {
    type Connection = MockConnection;

    async fn connect(&self) -> Result<MockConnection, ConnectionError> {
        if self.refuse_connections {
            debug!("Refusing connection.");
            return Err(ConnectionError::msg("connection refused"));
        }

        self.counters.opened.fetch_add(1, Ordering::Relaxed);
        self.counters.open.fetch_add(1, Ordering::Relaxed);
        Ok(MockConnection { db: self.clone() })
    }
}

pub struct MockConnection {
    db: MockDatabase,
}

impl Connection for MockConnection {
    async fn execute(&mut self, query: &str) -> Result<u64, ConnectionError> {
        let counters = &self.db.counters;
        counters.executed.fetch_add(1, Ordering::Relaxed);
        counters
            .log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());

        let delay = self.db.latency.sample();
        tokio::time::sleep(delay).await;

        if let Some(limiter) = &self.db.limiter {
            if limiter.check().is_err() {
                debug!("Rate limit exceeded");
                return Err(ConnectionError::msg("too many requests"));
            }
        }

        if let Some(needle) = self.db.failing.iter().find(|n| query.contains(n.as_str())) {
            debug!("Failing query containing {needle:?}");
            return Err(ConnectionError::msg(format!(
                "relation \"{needle}\" does not exist"
            )));
        }

        Ok(1)
    }

    async fn close(self) -> Result<(), ConnectionError> {
        Ok(())
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.db.counters.open.fetch_sub(1, Ordering::Relaxed);
    }
}

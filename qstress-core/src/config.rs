use crate::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_DURATION, DEFAULT_OUTPUT_FILE, DEFAULT_QUERY_TIMEOUT,
    DEFAULT_THREAD_COUNT,
};
#[cfg(feature = "rt")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
#[cfg(feature = "rt")]
use serde_with::{serde_as, DurationSeconds};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Addressing for the system under test.
///
/// The engine never looks inside; connection providers interpret it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
pub struct Target {
    pub server: String,
    pub database: String,
}

impl Target {
    pub fn new(server: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            database: database.into(),
        }
    }

    /// Build a `postgres://` URL. A server which already carries a scheme keeps it.
    pub fn postgres_url(&self) -> String {
        let server = self.server.trim_end_matches('/');
        if server.contains("://") {
            format!("{server}/{}", self.database)
        } else {
            format!("postgres://{server}/{}", self.database)
        }
    }

    /// Server with any `user:password@` prefix removed.
    fn host(&self) -> &str {
        let server = self
            .server
            .split_once("://")
            .map_or(self.server.as_str(), |(_, rest)| rest);
        server.rsplit_once('@').map_or(server, |(_, host)| host)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.host(), self.database)
    }
}

/// Configuration of a single load test run. Immutable once the run starts.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "rt", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
pub struct TestConfig {
    pub target: Target,
    pub query_template: String,
    #[cfg_attr(feature = "rt", serde(default = "default_thread_count"))]
    pub thread_count: usize,
    #[cfg_attr(feature = "rt", serde_as(as = "DurationSeconds"))]
    #[cfg_attr(feature = "rt", serde(default = "default_duration"))]
    pub duration: Duration,
    #[cfg_attr(feature = "rt", serde_as(as = "DurationSeconds"))]
    #[cfg_attr(feature = "rt", serde(default = "default_query_timeout"))]
    pub query_timeout: Duration,
    #[cfg_attr(feature = "rt", serde_as(as = "DurationSeconds"))]
    #[cfg_attr(feature = "rt", serde(default = "default_connect_timeout"))]
    pub connect_timeout: Duration,
    #[cfg_attr(feature = "rt", serde(default = "default_output"))]
    pub output: PathBuf,
}

impl TestConfig {
    pub fn new(target: Target, query_template: impl Into<String>) -> Self {
        Self {
            target,
            query_template: query_template.into(),
            thread_count: DEFAULT_THREAD_COUNT,
            duration: DEFAULT_DURATION,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }

    pub fn thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Bound on opening each connection, the pre-flight one included.
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

#[allow(unused)]
fn default_thread_count() -> usize {
    DEFAULT_THREAD_COUNT
}

#[allow(unused)]
fn default_duration() -> Duration {
    DEFAULT_DURATION
}

#[allow(unused)]
fn default_query_timeout() -> Duration {
    DEFAULT_QUERY_TIMEOUT
}

#[allow(unused)]
fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

#[allow(unused)]
fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

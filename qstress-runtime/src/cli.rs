use crate::error::RuntimeError;
use clap::Parser;
use qstress_core::{
    Target, TestConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DURATION, DEFAULT_OUTPUT_FILE,
    DEFAULT_QUERY_TIMEOUT, DEFAULT_THREAD_COUNT,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Hammer a database with a templated query from many connections at once.
///
/// Every run of `%` in the query is replaced by a zero-padded counter, so
/// `select * from orders where id = %%%` walks ids 000 through 999.
#[derive(Parser, Debug)]
#[command(name = "qstress", version)]
pub struct QStressCli {
    /// Database server, either `host[:port]` or a full `postgres://` URL.
    #[arg(short, long, env = "QSTRESS_SERVER", required_unless_present = "config")]
    pub server: Option<String>,

    #[arg(short, long, env = "QSTRESS_DATABASE", required_unless_present = "config")]
    pub database: Option<String>,

    /// Query template.
    #[arg(short, long, required_unless_present = "config")]
    pub query: Option<String>,

    /// Number of concurrent workers, each with its own connection.
    #[arg(short, long, default_value_t = DEFAULT_THREAD_COUNT)]
    pub threads: usize,

    /// Test duration in seconds.
    #[arg(long, default_value_t = DEFAULT_DURATION.as_secs())]
    pub duration: u64,

    /// Per-query timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_QUERY_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Connection timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs())]
    pub connect_timeout: u64,

    /// Where to write the CSV results.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Read the whole test configuration from a JSON file instead.
    #[arg(short, long, conflicts_with_all = ["server", "database", "query"])]
    pub config: Option<PathBuf>,

    /// Serve Prometheus metrics on this address while the test runs.
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,

    /// Log filter directive, e.g. `qstress=debug`. Defaults to `RUST_LOG`.
    #[arg(long)]
    pub log: Option<String>,
}

impl QStressCli {
    pub fn test_config(&self) -> Result<TestConfig, RuntimeError> {
        if let Some(path) = &self.config {
            return load_config(path);
        }

        let target = Target::new(
            self.server.clone().unwrap_or_default(),
            self.database.clone().unwrap_or_default(),
        );
        Ok(
            TestConfig::new(target, self.query.clone().unwrap_or_default())
                .thread_count(self.threads)
                .duration(Duration::from_secs(self.duration))
                .query_timeout(Duration::from_secs(self.timeout))
                .connect_timeout(Duration::from_secs(self.connect_timeout))
                .output(self.output.clone()),
        )
    }
}

/// Read a [`TestConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<TestConfig, RuntimeError> {
    let raw = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| RuntimeError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

use std::time::Duration;

/// The character whose runs are substituted with the attempt counter.
pub const PLACEHOLDER: char = '%';

/// Upper bound on a single query attempt, independent of cancellation.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on opening a single connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

pub const MIN_THREAD_COUNT: usize = 1;
pub const MAX_THREAD_COUNT: usize = 100;

pub const DEFAULT_THREAD_COUNT: usize = 50;
pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);
pub const DEFAULT_OUTPUT_FILE: &str = "results.csv";

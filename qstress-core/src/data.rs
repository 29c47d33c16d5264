#[cfg(feature = "rt")]
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]");

/// The identity of an attempt, captured before the query is sent.
///
/// Only [`AttemptStart::finish`] turns this into a [`ResultRecord`], so a record can never be
/// observed without its timing and outcome.
#[derive(Debug, Clone, Copy)]
pub struct AttemptStart {
    pub worker_id: usize,
    pub parameter_value: u64,
    pub timestamp: OffsetDateTime,
}

impl AttemptStart {
    pub fn now(worker_id: usize, parameter_value: u64) -> Self {
        Self {
            worker_id,
            parameter_value,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn finish(self, elapsed: Duration, error: Option<String>) -> ResultRecord {
        ResultRecord {
            execution_time_ms: elapsed.as_secs_f64() * 1e3,
            parameter_value: self.parameter_value,
            worker_id: self.worker_id,
            timestamp: self.timestamp,
            error,
        }
    }
}

/// One executed query attempt.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
pub struct ResultRecord {
    pub execution_time_ms: f64,
    pub parameter_value: u64,
    pub worker_id: usize,
    #[cfg_attr(feature = "rt", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
    pub error: Option<String>,
}

impl ResultRecord {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn execution_time(&self) -> Duration {
        Duration::from_secs_f64(self.execution_time_ms / 1e3)
    }

    /// Timestamp as `YYYY-MM-DDTHH:MM:SS.mmm` in UTC.
    pub fn formatted_timestamp(&self) -> Result<String, time::error::Format> {
        self.timestamp
            .to_offset(time::UtcOffset::UTC)
            .format(TIMESTAMP_FORMAT)
    }
}

use crate::ResultRecord;
use std::fmt;

/// Attempt counts for a finished run.
///
/// Latency distributions are left to whatever consumes the records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let failed = records.iter().filter(|r| r.is_error()).count();
        Self {
            total: records.len(),
            successful: records.len() - failed,
            failed,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total queries: {}, Successful: {}, Errors: {}",
            self.total, self.successful, self.failed
        )
    }
}

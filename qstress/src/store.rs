use metrics_util::AtomicBucket;
use qstress_core::ResultRecord;
use std::sync::Arc;

/// Append-only collection of result records shared by every worker of a run.
///
/// Appends are lock-free; reading happens once, after the workers have been joined.
#[derive(Clone)]
pub struct ResultStore {
    records: Arc<AtomicBucket<ResultRecord>>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(AtomicBucket::new()),
        }
    }

    pub fn push(&self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        let mut len = 0;
        self.records.data_with(|block| len += block.len());
        len
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drain every record published so far.
    pub fn take(&self) -> Vec<ResultRecord> {
        let mut records = Vec::with_capacity(self.len());
        self.records
            .clear_with(|block| records.extend_from_slice(block));
        records
    }
}

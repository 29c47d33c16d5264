#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod connection;
pub mod countdown;
pub mod error;
pub mod executor;
pub mod store;

pub(crate) mod worker;


pub use connection::{Connection, Connector};
pub use countdown::Countdown;
pub use error::{AttemptError, ConnectionError, LoadTestError};
pub use load_test::{run_load_test, LoadTest, ProgressSink, RunOutcome, RunState};
pub use store::ResultStore;

pub use qstress_core as core;

pub mod prelude {
    pub use crate::connection::{Connection, Connector};
    pub use crate::error::{ConnectionError, LoadTestError};
    pub use crate::load_test::{LoadTest, RunOutcome, RunState};
    pub use qstress_core::{ResultRecord, RunSummary, Target, TestConfig};
}

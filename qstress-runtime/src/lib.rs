//! The `qstress` command line tool: CLI and config loading, validation, CSV reports, the
//! countdown ticker and the Postgres connection provider.
pub mod cli;
pub mod error;
pub mod logging;
#[cfg(feature = "postgres")]
pub mod pg;
pub mod progress;
pub mod report;
pub mod runtime;
pub mod validate;

pub use crate::cli::QStressCli;
pub use crate::error::RuntimeError;
#[cfg(feature = "postgres")]
pub use crate::pg::PgConnector;
pub use crate::report::{save_results, write_csv, ReportError};
pub use crate::runtime::{QStressRuntime, RunReport};
pub use crate::validate::{validate, ValidationError, ValidationErrors};

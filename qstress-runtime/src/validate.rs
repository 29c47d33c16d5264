use qstress_core::{TestConfig, MAX_THREAD_COUNT, MIN_THREAD_COUNT};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Server is required")]
    MissingServer,

    #[error("Database is required")]
    MissingDatabase,

    #[error("Query is required")]
    MissingQuery,

    #[error("Thread count must be between 1 and 100, got {0}")]
    ThreadCount(usize),

    #[error("Duration must be at least one second")]
    Duration,

    #[error("Output file is required")]
    MissingOutput,
}

/// Every rule a configuration broke, in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

/// Check a configuration before anything connects to the target.
pub fn validate(config: &TestConfig) -> Result<(), ValidationErrors> {
    let mut errors = vec![];

    if config.target.server.trim().is_empty() {
        errors.push(ValidationError::MissingServer);
    }
    if config.target.database.trim().is_empty() {
        errors.push(ValidationError::MissingDatabase);
    }
    if config.query_template.trim().is_empty() {
        errors.push(ValidationError::MissingQuery);
    }
    if !(MIN_THREAD_COUNT..=MAX_THREAD_COUNT).contains(&config.thread_count) {
        errors.push(ValidationError::ThreadCount(config.thread_count));
    }
    // Durations are whole seconds on the wire.
    if config.duration.as_secs() == 0 {
        errors.push(ValidationError::Duration);
    }
    if config.output.as_os_str().is_empty() {
        errors.push(ValidationError::MissingOutput);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

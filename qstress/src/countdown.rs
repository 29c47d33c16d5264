use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// The fixed wall-clock window of a run.
///
/// Computed once before workers start and copied into each of them; nothing about it changes
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    started: Instant,
    deadline: Instant,
}

impl Countdown {
    pub fn start(duration: Duration) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: started + duration,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn duration(&self) -> Duration {
        self.deadline - self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Remaining whole seconds, rounded up.
    pub fn remaining_secs(&self) -> u64 {
        let remaining = self.remaining();
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.remaining_secs())
    }
}

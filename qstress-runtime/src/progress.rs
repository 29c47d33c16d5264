use qstress::{Countdown, RunState};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Call `on_tick` once per `period` while the run is in progress.
///
/// Returns the terminal state, or `None` if the run was dropped before it finished.
pub async fn countdown_ticker<F>(
    mut state: watch::Receiver<RunState>,
    period: Duration,
    mut on_tick: F,
) -> Option<RunState>
where
    F: FnMut(&Countdown),
{
    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let current = *state.borrow_and_update();
        match current {
            RunState::Running(countdown) => on_tick(&countdown),
            state if state.is_terminal() => return Some(state),
            _ => {}
        }

        tokio::select! {
            _ = interval.tick() => {}
            res = state.changed() => {
                if res.is_err() {
                    trace!("Run dropped before finishing.");
                    return None;
                }
            }
        }
    }
}

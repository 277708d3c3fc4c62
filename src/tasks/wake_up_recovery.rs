//! Wake-up recovery background task

use std::{sync::Arc, time::{Duration, Instant}};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// How long the host was suspended, judged by the wall clock running ahead
/// of the monotonic clock (which does not advance while suspended).
///
/// Returns `None` when the divergence stays below `threshold`.
pub fn suspension_gap(
    wall_elapsed: chrono::Duration,
    monotonic_elapsed: Duration,
    threshold: Duration,
) -> Option<Duration> {
    let wall = wall_elapsed.to_std().ok()?;
    let gap = wall.checked_sub(monotonic_elapsed)?;
    (gap >= threshold).then_some(gap)
}

/// Background task that checks for system wake-up and resynchronises the timer
pub async fn wake_up_recovery_task(state: Arc<AppState>, check_every: Duration, threshold: Duration) {
    info!("Starting wake-up recovery task");

    let mut interval = interval(check_every);
    let mut last_wall = state.clock.now();
    let mut last_monotonic = Instant::now();

    loop {
        interval.tick().await;

        let wall = state.clock.now();
        let monotonic = Instant::now();

        match suspension_gap(wall - last_wall, monotonic - last_monotonic, threshold) {
            Some(gap) => {
                info!("System wake-up detected after ~{}s, resynchronising timer", gap.as_secs());
                if let Err(e) = state.resync() {
                    warn!("Failed to resync after wake-up: {}", e);
                }
            }
            None => {
                debug!("No suspension detected");
            }
        }

        last_wall = wall;
        last_monotonic = monotonic;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = Duration::from_secs(2);

    #[test]
    fn steady_clocks_are_not_a_suspension() {
        assert_eq!(
            suspension_gap(chrono::Duration::seconds(5), Duration::from_millis(4900), THRESHOLD),
            None
        );
    }

    #[test]
    fn wall_clock_jump_is_a_suspension() {
        assert_eq!(
            suspension_gap(chrono::Duration::seconds(605), Duration::from_secs(5), THRESHOLD),
            Some(Duration::from_secs(600))
        );
    }

    #[test]
    fn wall_clock_going_backwards_is_ignored() {
        assert_eq!(
            suspension_gap(chrono::Duration::seconds(-30), Duration::from_secs(5), THRESHOLD),
            None
        );
        assert_eq!(
            suspension_gap(chrono::Duration::seconds(1), Duration::from_secs(5), THRESHOLD),
            None
        );
    }
}

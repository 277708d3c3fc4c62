//! Forward enumeration of phase boundaries for delivery while suspended

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{next_phase, phase_label, Phase, TimerState, WorkoutSchedule};

/// One future phase boundary, pinned to an absolute instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub identifier: String,
    pub at: DateTime<Utc>,
    /// Seconds after the moment of enumeration.
    pub offset_seconds: u64,
    pub phase: Phase,
    pub round: u32,
    pub label: String,
}

/// Every boundary still ahead of `state`, simulated to Finished.
///
/// A paused or inactive timer has no future boundaries.
pub fn enumerate_boundaries(
    schedule: &WorkoutSchedule,
    state: &TimerState,
    now: DateTime<Utc>,
) -> Vec<ScheduledEvent> {
    let mut events = Vec::new();
    if !state.is_running || !state.phase.is_active() {
        return events;
    }

    let mut offset = u64::from(state.time_remaining);
    let mut phase = state.phase;
    let mut round = state.current_round;

    while let Some(step) = next_phase(schedule, phase, round) {
        // Boundaries past the representable calendar cannot be delivered.
        let Some(at) = instant_after(now, offset) else {
            warn!("Stopping boundary enumeration at +{}s: instant out of range", offset);
            break;
        };
        events.push(ScheduledEvent {
            identifier: format!("boundary-{}", events.len()),
            at,
            offset_seconds: offset,
            phase: step.phase,
            round: step.round,
            label: phase_label(step.phase, step.round),
        });

        offset = offset.saturating_add(u64::from(step.duration));
        phase = step.phase;
        round = step.round;
    }

    events
}

fn instant_after(now: DateTime<Utc>, offset: u64) -> Option<DateTime<Utc>> {
    let offset = i64::try_from(offset).ok()?;
    now.checked_add_signed(Duration::try_seconds(offset)?)
}

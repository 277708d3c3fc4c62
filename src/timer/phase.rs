//! Phases, the observable timer state and the phase clock

use serde::{Deserialize, Serialize};

use super::WorkoutSchedule;

/// What the timer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Prepare,
    Round,
    Rest,
    Finished,
}

impl Phase {
    /// Whether the phase counts down (everything except Idle and Finished).
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Prepare | Phase::Round | Phase::Rest)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

/// Mutable timer state, exclusively owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub current_round: u32,
    pub time_remaining: u32,
    pub is_running: bool,
}

impl TimerState {
    /// Idle defaults: round 1, nothing remaining, not running.
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            current_round: 1,
            time_remaining: 0,
            is_running: false,
        }
    }

    pub fn phase_display_name(&self) -> String {
        phase_label(self.phase, self.current_round)
    }

    /// Remaining time as `m:ss`.
    pub fn formatted_time(&self) -> String {
        format!("{}:{:02}", self.time_remaining / 60, self.time_remaining % 60)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable name of `phase`; only rounds carry their number.
pub fn phase_label(phase: Phase, round: u32) -> String {
    match phase {
        Phase::Idle => "Ready".to_string(),
        Phase::Prepare => "Get Ready".to_string(),
        Phase::Round => format!("Round {}", round),
        Phase::Rest => "Rest".to_string(),
        Phase::Finished => "Finished".to_string(),
    }
}

/// Outcome of one phase-clock step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub phase: Phase,
    pub round: u32,
    pub duration: u32,
}

/// Where the workout goes when `phase` of `round` runs out.
///
/// Returns `None` for Idle and Finished, which have no successor.
pub fn next_phase(schedule: &WorkoutSchedule, phase: Phase, round: u32) -> Option<Transition> {
    let transition = match phase {
        Phase::Prepare => Transition {
            phase: Phase::Round,
            round: 1,
            duration: schedule.round_seconds(),
        },
        Phase::Round if round >= schedule.rounds() => Transition {
            phase: Phase::Finished,
            round,
            duration: 0,
        },
        Phase::Round if schedule.rest_seconds() > 0 => Transition {
            phase: Phase::Rest,
            round,
            duration: schedule.rest_seconds(),
        },
        Phase::Round | Phase::Rest => Transition {
            phase: Phase::Round,
            round: round + 1,
            duration: schedule.round_seconds(),
        },
        Phase::Idle | Phase::Finished => return None,
    };

    Some(transition)
}

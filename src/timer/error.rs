//! Schedule validation errors

use thiserror::Error;

/// Why a workout schedule was refused at construction time.
///
/// Negative durations cannot be expressed (all durations are unsigned
/// seconds), so only the zero checks remain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("a workout needs at least one round")]
    ZeroRounds,

    #[error("round time must be at least one second")]
    ZeroRoundTime,

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

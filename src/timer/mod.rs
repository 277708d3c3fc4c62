//! Round timer core
//!
//! Schedule value, phase clock, cue policy, background boundary enumeration
//! and the engine that ties them together. Nothing in here touches the
//! network or the runtime directly; the host supplies a [`Clock`], a
//! [`Ticker`] and the sinks.

pub mod background;
pub mod cues;
pub mod engine;
pub mod error;
pub mod phase;
pub mod ports;
pub mod schedule;

#[cfg(test)]
pub(crate) mod fakes;

pub use background::{enumerate_boundaries, ScheduledEvent};
pub use cues::{boundary_cue, per_second_cues, Cue, CueSettings, Haptic};
pub use engine::{EngineEvent, EngineSnapshot, TimerEngine};
pub use error::ScheduleError;
pub use phase::{next_phase, phase_label, Phase, TimerState, Transition};
pub use ports::{Clock, Collaborators, CompletionSink, CueSink, NotificationSink, Ticker, WorkoutSummary};
pub use schedule::{ScheduleSpec, WorkoutSchedule};

//! Capabilities the engine consumes from its host
//!
//! Every collaborator is injected at construction so tests can substitute
//! fakes. Failures reported through these traits are logged and swallowed by
//! the engine; none of them can affect timer correctness.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cue, ScheduledEvent};

/// Wall-clock source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// "Run the engine tick every second until cancelled."
///
/// `start` must replace any tick source already running, never add a second one.
pub trait Ticker: Send + Sync {
    fn start(&self);
    fn cancel(&self);
}

/// Fire-and-forget sound/haptic playback.
pub trait CueSink: Send + Sync {
    fn play(&self, cue: Cue) -> Result<(), String>;
}

/// Notification / live-activity delivery for while the engine is not executing.
pub trait NotificationSink: Send + Sync {
    fn schedule(&self, events: &[ScheduledEvent]) -> Result<(), String>;
    fn cancel_all(&self) -> Result<(), String>;
}

/// Receives one summary per workout, for history and health logging.
pub trait CompletionSink: Send + Sync {
    fn record(&self, summary: WorkoutSummary) -> Result<(), String>;
}

/// Flat record handed to the completion sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub preset_name: String,
    pub total_time: u64,
    pub rounds_completed: u32,
    pub total_rounds: u32,
}

/// Bundle of collaborators handed to [`TimerEngine::new`](super::TimerEngine::new).
#[derive(Clone)]
pub struct Collaborators {
    pub clock: Arc<dyn Clock>,
    pub ticker: Arc<dyn Ticker>,
    pub cues: Arc<dyn CueSink>,
    pub notifications: Arc<dyn NotificationSink>,
    pub completion: Arc<dyn CompletionSink>,
}

//! Host-side collaborators module
//! 
//! Concrete implementations of the capabilities the timer engine consumes:
//! wall clock, ticker handle, cue playback, notification outbox and history.

pub mod clock;
pub mod cues;
pub mod history;
pub mod notifications;
pub mod ticker;

// Re-export main types
pub use clock::SystemClock;
pub use cues::LoggingCuePlayer;
pub use history::{format_training_time, HistoryStats, WorkoutHistory, WorkoutRecord};
pub use notifications::NotificationOutbox;
pub use ticker::{ChannelTicker, TickCommand};

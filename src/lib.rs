//! Ring Timer - A round-based interval timer for combat-sports training
//! 
//! Prepare, round and rest phases repeated for N rounds, with cues at fixed
//! thresholds, wall-clock resynchronisation after suspension and forward
//! enumeration of phase boundaries for delivery while backgrounded. The
//! daemon exposes the engine over a small HTTP control API.

pub mod config;
pub mod timer;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use timer::{TimerEngine, WorkoutSchedule};
pub use utils::signals::shutdown_signal;

//! State management module
//! 
//! Shared application state: the timer engine behind its mutex plus the
//! stores the HTTP handlers read from.

pub mod app_state;

// Re-export main types
pub use app_state::AppState;

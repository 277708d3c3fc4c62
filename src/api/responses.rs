//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::{HistoryStats, WorkoutRecord},
    timer::{CueSettings, EngineSnapshot, WorkoutSchedule},
};

/// Body of `POST /start`: a built-in preset by name, or an explicit schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    pub preset: Option<String>,
    pub schedule: Option<WorkoutSchedule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddTimeRequest {
    pub seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MuteRequest {
    pub muted: bool,
}

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: EngineSnapshot,
}

impl ApiResponse {
    /// Create a new API response, with status derived from the timer
    pub fn new(message: String, timer: EngineSnapshot) -> Self {
        let status = if timer.state.is_running { "running" } else { "stopped" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Status response with the full timer snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: EngineSnapshot,
    pub settings: CueSettings,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub records: Vec<WorkoutRecord>,
    pub stats: HistoryStats,
    pub formatted_total_time: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

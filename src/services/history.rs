//! Workout history, fed by the engine's completion sink

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::timer::{Clock, CompletionSink, WorkoutSummary};

/// One finished or abandoned workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: u64,
    pub preset_name: String,
    pub date: DateTime<Utc>,
    /// Seconds
    pub total_time: u64,
    pub rounds_completed: u32,
    pub total_rounds: u32,
}

impl WorkoutRecord {
    pub fn is_complete(&self) -> bool {
        self.rounds_completed >= self.total_rounds
    }
}

/// Aggregates over the stored records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_workouts: usize,
    pub total_training_seconds: u64,
    pub this_week_workouts: usize,
}

#[derive(Debug, Default)]
struct HistoryInner {
    next_id: u64,
    /// Newest first.
    records: Vec<WorkoutRecord>,
}

/// Records are dated by the same clock that drives the engine.
pub struct WorkoutHistory {
    inner: Mutex<HistoryInner>,
    clock: Arc<dyn Clock>,
}

impl WorkoutHistory {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(HistoryInner::default()),
            clock,
        }
    }

    pub fn add(&self, summary: WorkoutSummary, date: DateTime<Utc>) -> Result<WorkoutRecord, String> {
        let mut inner = self.inner.lock()
            .map_err(|e| format!("Failed to lock workout history: {}", e))?;

        inner.next_id += 1;
        let record = WorkoutRecord {
            id: inner.next_id,
            preset_name: summary.preset_name,
            date,
            total_time: summary.total_time,
            rounds_completed: summary.rounds_completed,
            total_rounds: summary.total_rounds,
        };
        inner.records.insert(0, record.clone());
        Ok(record)
    }

    pub fn records(&self) -> Result<Vec<WorkoutRecord>, String> {
        self.inner.lock()
            .map(|inner| inner.records.clone())
            .map_err(|e| format!("Failed to lock workout history: {}", e))
    }

    pub fn clear(&self) -> Result<(), String> {
        let mut inner = self.inner.lock()
            .map_err(|e| format!("Failed to lock workout history: {}", e))?;
        inner.records.clear();
        Ok(())
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<HistoryStats, String> {
        let records = self.records()?;
        let week_ago = now - Duration::days(7);

        Ok(HistoryStats {
            total_workouts: records.len(),
            total_training_seconds: records.iter().map(|r| r.total_time).sum(),
            this_week_workouts: records.iter().filter(|r| r.date > week_ago).count(),
        })
    }
}

impl CompletionSink for WorkoutHistory {
    fn record(&self, summary: WorkoutSummary) -> Result<(), String> {
        let record = self.add(summary, self.clock.now())?;
        info!(
            "Recorded workout '{}': {}s, {}/{} rounds",
            record.preset_name, record.total_time, record.rounds_completed, record.total_rounds
        );
        Ok(())
    }
}

/// `1h 5m` / `12m` style total.
pub fn format_training_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

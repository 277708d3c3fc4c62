//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{error, warn};

use crate::{
    services::{LoggingCuePlayer, NotificationOutbox, SystemClock, WorkoutHistory},
    timer::{
        Clock, Collaborators, CueSettings, EngineEvent, EngineSnapshot, Ticker, TimerEngine,
    },
};

/// Shared state for HTTP handlers and background tasks.
///
/// The engine sits behind a single mutex, so commands and ticks are applied
/// one at a time and never observe a half-updated state.
pub struct AppState {
    pub engine: Arc<Mutex<TimerEngine>>,
    pub clock: Arc<dyn Clock>,
    /// Boundary notifications waiting for the host while backgrounded
    pub outbox: Arc<NotificationOutbox>,
    pub history: Arc<WorkoutHistory>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Latest engine snapshot after every command or tick
    pub snapshot_tx: watch::Sender<EngineSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<EngineSnapshot>,
}

impl AppState {
    /// Wire the engine to the system clock, the log-backed cue player, the
    /// in-memory notification outbox and workout history.
    pub fn new(port: u16, host: String, settings: CueSettings, ticker: Arc<dyn Ticker>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let outbox = Arc::new(NotificationOutbox::new());
        let history = Arc::new(WorkoutHistory::new(Arc::clone(&clock)));

        let collaborators = Collaborators {
            clock: Arc::clone(&clock),
            ticker,
            cues: Arc::new(LoggingCuePlayer),
            notifications: outbox.clone(),
            completion: history.clone(),
        };

        let engine = TimerEngine::new(settings, collaborators);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        Self {
            engine: Arc::new(Mutex::new(engine)),
            clock,
            outbox,
            history,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Apply a user command to the engine and publish the resulting snapshot.
    pub fn command<F>(&self, action: &str, apply: F) -> Result<EngineSnapshot, String>
    where
        F: FnOnce(&mut TimerEngine),
    {
        let snapshot = self.with_engine(apply)?;

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(snapshot)
    }

    /// Deliver one periodic tick.
    pub fn tick(&self) -> Result<EngineSnapshot, String> {
        self.with_engine(TimerEngine::tick)
    }

    /// Reconcile with the wall clock after a detected suspension.
    pub fn resync(&self) -> Result<EngineSnapshot, String> {
        self.with_engine(TimerEngine::resync)
    }

    pub fn snapshot(&self) -> Result<EngineSnapshot, String> {
        self.engine.lock()
            .map(|engine| engine.snapshot())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    pub fn settings(&self) -> Result<CueSettings, String> {
        self.engine.lock()
            .map(|engine| engine.settings())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    pub fn subscribe_events(&self) -> Result<broadcast::Receiver<EngineEvent>, String> {
        self.engine.lock()
            .map(|engine| engine.subscribe())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    fn with_engine<F>(&self, apply: F) -> Result<EngineSnapshot, String>
    where
        F: FnOnce(&mut TimerEngine),
    {
        let mut engine = self.engine.lock().map_err(|e| {
            error!("Timer engine lock poisoned: {}", e);
            format!("Failed to lock timer engine: {}", e)
        })?;

        apply(&mut *engine);
        let snapshot = engine.snapshot();
        drop(engine); // Release the lock early

        // Notify snapshot watchers
        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to publish timer snapshot: {}", e);
        }

        Ok(snapshot)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

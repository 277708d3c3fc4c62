//! In-memory collaborators for engine tests

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::broadcast;

use super::{
    Clock, Collaborators, CompletionSink, Cue, CueSettings, CueSink, EngineEvent,
    NotificationSink, Phase, ScheduledEvent, Ticker, TimerEngine, WorkoutSummary,
};

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, seconds: i64) {
        *self.now.lock().unwrap() += Duration::seconds(seconds);
    }

    pub fn advance_millis(&self, millis: i64) {
        *self.now.lock().unwrap() += Duration::milliseconds(millis);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingTicker {
    starts: AtomicUsize,
    cancels: AtomicUsize,
}

impl RecordingTicker {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl Ticker for RecordingTicker {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingCues {
    played: Mutex<Vec<Cue>>,
    fail: bool,
}

impl RecordingCues {
    pub fn played(&self) -> Vec<Cue> {
        self.played.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.played.lock().unwrap().clear();
    }
}

impl CueSink for RecordingCues {
    fn play(&self, cue: Cue) -> Result<(), String> {
        self.played.lock().unwrap().push(cue);
        if self.fail {
            Err("speaker unplugged".to_string())
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationCall {
    Schedule(Vec<ScheduledEvent>),
    CancelAll,
}

#[derive(Default)]
pub struct RecordingNotifications {
    calls: Mutex<Vec<NotificationCall>>,
    pending: Mutex<Vec<ScheduledEvent>>,
    max_pending: AtomicUsize,
}

impl RecordingNotifications {
    pub fn calls(&self) -> Vec<NotificationCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pending(&self) -> Vec<ScheduledEvent> {
        self.pending.lock().unwrap().clone()
    }

    /// Largest number of simultaneously pending events ever seen.
    pub fn max_pending(&self) -> usize {
        self.max_pending.load(Ordering::SeqCst)
    }
}

impl NotificationSink for RecordingNotifications {
    fn schedule(&self, events: &[ScheduledEvent]) -> Result<(), String> {
        self.calls
            .lock()
            .unwrap()
            .push(NotificationCall::Schedule(events.to_vec()));
        let mut pending = self.pending.lock().unwrap();
        pending.extend_from_slice(events);
        self.max_pending.fetch_max(pending.len(), Ordering::SeqCst);
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), String> {
        self.calls.lock().unwrap().push(NotificationCall::CancelAll);
        self.pending.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingCompletion {
    summaries: Mutex<Vec<WorkoutSummary>>,
}

impl RecordingCompletion {
    pub fn summaries(&self) -> Vec<WorkoutSummary> {
        self.summaries.lock().unwrap().clone()
    }
}

impl CompletionSink for RecordingCompletion {
    fn record(&self, summary: WorkoutSummary) -> Result<(), String> {
        self.summaries.lock().unwrap().push(summary);
        Ok(())
    }
}

/// All fakes wired together, with handles kept for assertions.
pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub ticker: Arc<RecordingTicker>,
    pub cues: Arc<RecordingCues>,
    pub notifications: Arc<RecordingNotifications>,
    pub completion: Arc<RecordingCompletion>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_cues(RecordingCues::default())
    }

    pub fn failing_cues() -> Self {
        Self::with_cues(RecordingCues {
            fail: true,
            ..RecordingCues::default()
        })
    }

    fn with_cues(cues: RecordingCues) -> Self {
        Self {
            clock: Arc::new(ManualClock::new()),
            ticker: Arc::new(RecordingTicker::default()),
            cues: Arc::new(cues),
            notifications: Arc::new(RecordingNotifications::default()),
            completion: Arc::new(RecordingCompletion::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            clock: self.clock.clone(),
            ticker: self.ticker.clone(),
            cues: self.cues.clone(),
            notifications: self.notifications.clone(),
            completion: self.completion.clone(),
        }
    }

    pub fn engine(&self) -> TimerEngine {
        TimerEngine::new(CueSettings::default(), self.collaborators())
    }

    /// Drain `events`, keeping the phases entered.
    pub fn observed_phases(&self, events: &mut broadcast::Receiver<EngineEvent>) -> Vec<Phase> {
        std::iter::from_fn(|| events.try_recv().ok())
            .filter_map(|event| match event {
                EngineEvent::PhaseEntered { phase, .. } => Some(phase),
                _ => None,
            })
            .collect()
    }
}

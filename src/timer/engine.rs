//! The stateful timer engine
//!
//! Owns the [`TimerState`] of one workout, is driven by a 1 Hz tick from a
//! [`Ticker`](super::Ticker) and by wall-clock resynchronisation after the host
//! was suspended. All collaborator I/O is fire-and-forget.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{
    boundary_cue, enumerate_boundaries, next_phase, per_second_cues, Collaborators, Cue,
    CueSettings, Phase, TimerState, WorkoutSchedule, WorkoutSummary,
};

/// Notifications raised by the engine for outside observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    PhaseEntered {
        phase: Phase,
        round: u32,
    },
    Cue {
        cue: Cue,
    },
    WorkoutFinished {
        elapsed_seconds: u64,
        rounds_completed: u32,
        total_rounds: u32,
    },
}

/// Everything an observer (status endpoint, live activity) needs in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    #[serde(flatten)]
    pub state: TimerState,
    pub phase_display_name: String,
    pub formatted_time: String,
    pub elapsed_seconds: u64,
    pub muted: bool,
    pub preset_name: Option<String>,
    pub total_rounds: Option<u32>,
    pub phase_end: Option<DateTime<Utc>>,
    pub in_background: bool,
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        let state = TimerState::new();
        Self {
            phase_display_name: state.phase_display_name(),
            formatted_time: state.formatted_time(),
            state,
            elapsed_seconds: 0,
            muted: false,
            preset_name: None,
            total_rounds: None,
            phase_end: None,
            in_background: false,
        }
    }
}

const EVENT_CAPACITY: usize = 256;

pub struct TimerEngine {
    state: TimerState,
    schedule: Option<WorkoutSchedule>,
    settings: CueSettings,
    started_at: Option<DateTime<Utc>>,
    /// Wall-clock instant the current phase runs out; only set while running.
    phase_end: Option<DateTime<Utc>>,
    elapsed_seconds: u64,
    in_background: bool,
    /// Whether this workout's summary already went to the completion sink.
    recorded: bool,
    collaborators: Collaborators,
    events: broadcast::Sender<EngineEvent>,
}

impl TimerEngine {
    pub fn new(settings: CueSettings, collaborators: Collaborators) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            state: TimerState::new(),
            schedule: None,
            settings,
            started_at: None,
            phase_end: None,
            elapsed_seconds: 0,
            in_background: false,
            recorded: false,
            collaborators,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn schedule(&self) -> Option<&WorkoutSchedule> {
        self.schedule.as_ref()
    }

    pub fn settings(&self) -> CueSettings {
        self.settings
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn phase_end(&self) -> Option<DateTime<Utc>> {
        self.phase_end
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state: self.state.clone(),
            phase_display_name: self.state.phase_display_name(),
            formatted_time: self.state.formatted_time(),
            elapsed_seconds: self.elapsed_seconds,
            muted: self.settings.muted,
            preset_name: self.schedule.as_ref().map(|s| s.name().to_string()),
            total_rounds: self.schedule.as_ref().map(|s| s.rounds()),
            phase_end: self.phase_end,
            in_background: self.in_background,
        }
    }

    /// Begin a fresh workout. A workout already in progress is stopped first.
    pub fn start(&mut self, schedule: WorkoutSchedule) {
        if self.state.phase.is_active() {
            info!("Starting over an active workout, stopping it first");
            self.stop();
        }

        let now = self.now();
        let phase = schedule.opening_phase();
        let duration = schedule.nominal_duration(phase);

        info!(
            "Starting workout '{}': prepare={}s round={}s rest={}s rounds={}",
            schedule.name(),
            schedule.prepare_seconds(),
            schedule.round_seconds(),
            schedule.rest_seconds(),
            schedule.rounds()
        );

        self.state = TimerState {
            phase,
            current_round: 1,
            time_remaining: duration,
            is_running: true,
        };
        self.schedule = Some(schedule);
        self.started_at = Some(now);
        self.phase_end = Some(now + seconds(duration));
        self.elapsed_seconds = 0;
        self.recorded = false;

        self.collaborators.ticker.start();
        self.emit(EngineEvent::PhaseEntered { phase, round: 1 });
        self.refresh_background();
    }

    pub fn pause(&mut self) {
        if !self.state.is_running {
            return;
        }

        info!("Pausing in {:?} with {}s remaining", self.state.phase, self.state.time_remaining);
        self.state.is_running = false;
        self.phase_end = None;
        self.collaborators.ticker.cancel();
        self.refresh_background();
    }

    /// No-op outside Prepare/Round/Rest or when already running.
    pub fn resume(&mut self) {
        if !self.state.phase.is_active() || self.state.is_running {
            return;
        }

        info!("Resuming {:?} with {}s remaining", self.state.phase, self.state.time_remaining);
        let now = self.now();
        self.state.is_running = true;
        self.phase_end = Some(now + seconds(self.state.time_remaining));
        self.collaborators.ticker.start();
        self.refresh_background();
    }

    pub fn toggle_pause_resume(&mut self) {
        if self.state.is_running {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Halt everything and return to Idle. Always succeeds.
    pub fn stop(&mut self) {
        self.collaborators.ticker.cancel();

        if self.state.phase.is_active() {
            let now = self.now();
            self.elapsed_seconds = self.elapsed_at(now);
            info!(
                "Stopping workout mid-way after {}s in {:?}",
                self.elapsed_seconds, self.state.phase
            );
            self.record_completion();
        }

        self.state = TimerState::new();
        self.schedule = None;
        self.started_at = None;
        self.phase_end = None;
        self.cancel_notifications();
    }

    /// Reset the current phase to its full length, resuming if paused.
    pub fn restart_current_phase(&mut self) {
        let Some(schedule) = self.schedule.as_ref() else {
            return;
        };
        if !self.state.phase.is_active() {
            return;
        }

        self.state.time_remaining = schedule.nominal_duration(self.state.phase);
        info!("Restarting {:?} at {}s", self.state.phase, self.state.time_remaining);

        if self.state.is_running {
            let now = self.now();
            self.phase_end = Some(now + seconds(self.state.time_remaining));
            self.refresh_background();
        } else {
            self.resume();
        }
    }

    /// Jump to the next phase as if the current one had run out.
    pub fn skip_phase(&mut self) {
        if !self.state.phase.is_active() {
            return;
        }

        info!("Skipping {:?}", self.state.phase);
        self.state.time_remaining = 0;
        let now = self.now();
        self.advance(now);

        if self.state.phase == Phase::Finished {
            return;
        }
        if self.state.is_running {
            self.refresh_background();
        } else {
            self.resume();
        }
    }

    /// Shift the current phase by `delta` seconds (negative to subtract).
    ///
    /// The result is clamped to `[0, nominal duration]`; the phase end moves by
    /// the amount actually applied.
    pub fn add_time(&mut self, delta: i64) {
        let Some(schedule) = self.schedule.as_ref() else {
            return;
        };
        if !self.state.phase.is_active() {
            return;
        }

        let nominal = i64::from(schedule.nominal_duration(self.state.phase));
        let current = i64::from(self.state.time_remaining);
        let adjusted = current.saturating_add(delta).clamp(0, nominal);
        let applied = adjusted - current;

        self.state.time_remaining = adjusted as u32;
        if let Some(end) = self.phase_end {
            self.phase_end = Some(end + Duration::seconds(applied));
        }

        info!("Adjusted {:?} by {}s (requested {}s)", self.state.phase, applied, delta);
        self.refresh_background();
    }

    pub fn set_muted(&mut self, muted: bool) {
        info!("Cues {}", if muted { "muted" } else { "unmuted" });
        self.settings.muted = muted;
    }

    pub fn set_settings(&mut self, settings: CueSettings) {
        self.settings = settings;
        self.refresh_background();
    }

    /// One 1 Hz step: cues for the current value, then decrement or transition.
    pub fn tick(&mut self) {
        if !self.state.is_running {
            return;
        }

        let now = self.now();
        self.elapsed_seconds = self.elapsed_at(now);

        for cue in per_second_cues(self.state.phase, self.state.time_remaining, &self.settings) {
            self.play(cue);
        }

        if self.state.time_remaining > 0 {
            self.state.time_remaining -= 1;
            debug!("{:?} {}s remaining", self.state.phase, self.state.time_remaining);
        } else {
            self.advance(now);
        }
    }

    /// Reconcile state with the wall clock after an unknown gap in ticks.
    ///
    /// Missed boundaries are replayed one transition at a time (one bell
    /// each), so the work is bounded by the number of phases left rather than
    /// the number of missed seconds.
    pub fn resync(&mut self) {
        if !self.state.is_running {
            return;
        }
        let Some(end) = self.phase_end else {
            return;
        };

        let now = self.now();
        self.elapsed_seconds = self.elapsed_at(now);
        let remaining = ceil_seconds(end - now);

        if remaining > 0 {
            let nominal = self
                .schedule
                .as_ref()
                .map_or(0, |s| s.nominal_duration(self.state.phase));
            self.state.time_remaining = remaining.min(i64::from(nominal)) as u32;
            debug!("Resync within {:?}: {}s remaining", self.state.phase, self.state.time_remaining);
            return;
        }

        // The current phase is over even when no whole second was missed.
        self.state.time_remaining = 0;
        let mut missed = remaining.unsigned_abs();
        let mut transitions = 0u32;
        info!("Resync: {}s past the end of {:?}, catching up", missed, self.state.phase);

        while missed > 0 && self.state.phase != Phase::Finished {
            let happened_at = now - Duration::seconds(missed as i64);
            if !self.advance(happened_at) {
                break;
            }
            transitions += 1;

            let entered = u64::from(self.state.time_remaining);
            if missed >= entered {
                missed -= entered;
                self.state.time_remaining = 0;
            } else {
                self.state.time_remaining = (entered - missed) as u32;
                missed = 0;
            }
        }

        if self.state.phase != Phase::Finished {
            self.phase_end = Some(now + seconds(self.state.time_remaining));
        }

        info!(
            "Resync replayed {} transitions, now {:?} round {} with {}s remaining",
            transitions, self.state.phase, self.state.current_round, self.state.time_remaining
        );
    }

    /// The host is about to stop executing the engine; hand the remaining
    /// boundaries to the notification sink.
    pub fn enter_background(&mut self) {
        info!("Entering background");
        self.in_background = true;
        self.resync();
        self.refresh_background();
    }

    /// The host is executing again; drop pending notifications and catch up.
    pub fn enter_foreground(&mut self) {
        info!("Entering foreground");
        self.in_background = false;
        self.cancel_notifications();
        self.resync();
    }

    /// Apply the phase clock at `at`. Returns false when there is no successor.
    fn advance(&mut self, at: DateTime<Utc>) -> bool {
        let Some(schedule) = self.schedule.as_ref() else {
            return false;
        };
        let Some(step) = next_phase(schedule, self.state.phase, self.state.current_round) else {
            return false;
        };

        if let Some(cue) = boundary_cue(step.phase, &self.settings) {
            self.play(cue);
        }

        info!("{:?} -> {:?} (round {})", self.state.phase, step.phase, step.round);
        self.state.phase = step.phase;
        self.state.current_round = step.round;
        self.state.time_remaining = step.duration;
        self.emit(EngineEvent::PhaseEntered {
            phase: step.phase,
            round: step.round,
        });

        if step.phase == Phase::Finished {
            self.finish(at);
        } else if self.state.is_running {
            self.phase_end = Some(at + seconds(step.duration));
        }

        true
    }

    fn finish(&mut self, at: DateTime<Utc>) {
        self.state.is_running = false;
        self.state.time_remaining = 0;
        self.phase_end = None;
        self.elapsed_seconds = self.elapsed_at(at);
        self.collaborators.ticker.cancel();
        self.cancel_notifications();

        let total_rounds = self.schedule.as_ref().map_or(0, |s| s.rounds());
        info!("Workout finished after {}s", self.elapsed_seconds);
        self.emit(EngineEvent::WorkoutFinished {
            elapsed_seconds: self.elapsed_seconds,
            rounds_completed: self.rounds_completed(),
            total_rounds,
        });
        self.record_completion();
    }

    fn rounds_completed(&self) -> u32 {
        match self.state.phase {
            Phase::Idle | Phase::Prepare => 0,
            Phase::Round => self.state.current_round - 1,
            Phase::Rest => self.state.current_round,
            Phase::Finished => self.schedule.as_ref().map_or(0, |s| s.rounds()),
        }
    }

    fn record_completion(&mut self) {
        if self.recorded {
            return;
        }
        let Some(schedule) = self.schedule.as_ref() else {
            return;
        };

        let summary = WorkoutSummary {
            preset_name: schedule.name().to_string(),
            total_time: self.elapsed_seconds,
            rounds_completed: self.rounds_completed(),
            total_rounds: schedule.rounds(),
        };
        self.recorded = true;

        if let Err(e) = self.collaborators.completion.record(summary) {
            warn!("Failed to record workout: {}", e);
        }
    }

    /// Cancel pending notifications and, while backgrounded and running,
    /// schedule a fresh set for the current state.
    fn refresh_background(&mut self) {
        if !self.in_background {
            return;
        }
        self.cancel_notifications();

        if !self.settings.notifications_enabled {
            return;
        }
        let Some(schedule) = self.schedule.as_ref() else {
            return;
        };

        let events = enumerate_boundaries(schedule, &self.state, self.now());
        if events.is_empty() {
            return;
        }
        debug!("Scheduling {} background boundaries", events.len());
        if let Err(e) = self.collaborators.notifications.schedule(&events) {
            warn!("Failed to schedule background notifications: {}", e);
        }
    }

    fn cancel_notifications(&self) {
        if let Err(e) = self.collaborators.notifications.cancel_all() {
            warn!("Failed to cancel pending notifications: {}", e);
        }
    }

    fn play(&self, cue: Cue) {
        if let Err(e) = self.collaborators.cues.play(cue) {
            warn!("Cue {:?} failed: {}", cue, e);
        }
        self.emit(EngineEvent::Cue { cue });
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn now(&self) -> DateTime<Utc> {
        self.collaborators.clock.now()
    }

    fn elapsed_at(&self, at: DateTime<Utc>) -> u64 {
        self.started_at
            .map_or(0, |start| (at - start).num_seconds().max(0) as u64)
    }
}

fn seconds(value: u32) -> Duration {
    Duration::seconds(i64::from(value))
}

/// Whole seconds, rounding partial seconds up so a resync shortly after a
/// tick does not shave a second off the display.
fn ceil_seconds(delta: Duration) -> i64 {
    let millis = delta.num_milliseconds();
    millis.div_euclid(1000) + i64::from(millis.rem_euclid(1000) > 0)
}

//! Cue kinds and the per-second cue policy

use serde::{Deserialize, Serialize};

use super::Phase;

/// Strength of the haptic pulse that accompanies a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Haptic {
    Light,
    Medium,
    Heavy,
}

/// An audio/haptic request tied to a timing threshold or a phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cue {
    /// Final seconds of a phase (3, 2, 1).
    Countdown { phase: Phase, seconds: u32 },
    /// Pre-end warning in a round or rest.
    Warning { phase: Phase },
    /// Phase boundary; carries the phase being entered.
    Bell { entering: Phase },
}

impl Cue {
    pub fn haptic(&self) -> Haptic {
        match self {
            Cue::Bell { .. } => Haptic::Heavy,
            Cue::Warning { .. } | Cue::Countdown { phase: Phase::Round, .. } => Haptic::Medium,
            Cue::Countdown { .. } => Haptic::Light,
        }
    }

    /// Sound asset name for players that map cues to files.
    pub fn sound_name(&self) -> &'static str {
        match self {
            Cue::Bell { .. } => "bell",
            Cue::Warning { .. } => "stick_punch",
            Cue::Countdown { .. } => "countdown",
        }
    }
}

/// Snapshot of the cross-cutting flags read at tick time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueSettings {
    pub muted: bool,
    pub notifications_enabled: bool,
    /// Seconds remaining at which the round/rest warning fires.
    pub warning_threshold: u32,
}

impl Default for CueSettings {
    fn default() -> Self {
        Self {
            muted: false,
            notifications_enabled: true,
            warning_threshold: 10,
        }
    }
}

const COUNTDOWN_FROM: u32 = 3;

/// Per-second cues due for `time_remaining` in `phase`, evaluated before the decrement.
///
/// Boundary bells are not produced here; the engine raises those on transition.
pub fn per_second_cues(phase: Phase, time_remaining: u32, settings: &CueSettings) -> Vec<Cue> {
    let mut cues = Vec::new();
    if settings.muted {
        return cues;
    }

    let has_warning = matches!(phase, Phase::Round | Phase::Rest);
    if has_warning && settings.warning_threshold > 0 && time_remaining == settings.warning_threshold {
        cues.push(Cue::Warning { phase });
    }

    if phase.is_active() && (1..=COUNTDOWN_FROM).contains(&time_remaining) {
        cues.push(Cue::Countdown {
            phase,
            seconds: time_remaining,
        });
    }

    cues
}

/// Bell for entering `phase`, unless muted.
pub fn boundary_cue(entering: Phase, settings: &CueSettings) -> Option<Cue> {
    if settings.muted {
        None
    } else {
        Some(Cue::Bell { entering })
    }
}

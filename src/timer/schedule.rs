//! Workout schedule value and the built-in presets

use serde::{Deserialize, Serialize};

use super::{Phase, ScheduleError};

/// Raw, unvalidated schedule fields as they arrive from the outside world.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSpec {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub prepare_seconds: u32,
    pub round_seconds: u32,
    #[serde(default)]
    pub rest_seconds: u32,
    pub rounds: u32,
}

fn default_name() -> String {
    "Custom".to_string()
}

/// Immutable per-workout configuration of durations and round count.
///
/// Only obtainable through [`WorkoutSchedule::new`] (or deserialisation,
/// which goes through the same checks), so the engine never sees an
/// invalid schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleSpec")]
pub struct WorkoutSchedule {
    name: String,
    prepare_seconds: u32,
    round_seconds: u32,
    rest_seconds: u32,
    rounds: u32,
}

impl WorkoutSchedule {
    pub fn new(
        name: impl Into<String>,
        prepare_seconds: u32,
        round_seconds: u32,
        rest_seconds: u32,
        rounds: u32,
    ) -> Result<Self, ScheduleError> {
        if rounds == 0 {
            return Err(ScheduleError::ZeroRounds);
        }
        if round_seconds == 0 {
            return Err(ScheduleError::ZeroRoundTime);
        }

        Ok(Self {
            name: name.into(),
            prepare_seconds,
            round_seconds,
            rest_seconds,
            rounds,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prepare_seconds(&self) -> u32 {
        self.prepare_seconds
    }

    pub fn round_seconds(&self) -> u32 {
        self.round_seconds
    }

    pub fn rest_seconds(&self) -> u32 {
        self.rest_seconds
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Nominal length of `phase` under this schedule. Idle and Finished have none.
    pub fn nominal_duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Prepare => self.prepare_seconds,
            Phase::Round => self.round_seconds,
            Phase::Rest => self.rest_seconds,
            Phase::Idle | Phase::Finished => 0,
        }
    }

    /// Sum of every phase from start to Finished, skipped phases contributing nothing.
    pub fn total_seconds(&self) -> u64 {
        let rounds = u64::from(self.rounds);
        u64::from(self.prepare_seconds)
            + rounds * u64::from(self.round_seconds)
            + (rounds - 1) * u64::from(self.rest_seconds)
    }

    /// The phase a fresh workout opens with.
    pub fn opening_phase(&self) -> Phase {
        if self.prepare_seconds > 0 {
            Phase::Prepare
        } else {
            Phase::Round
        }
    }

    pub fn boxing_standard() -> Self {
        Self::preset("Boxing Standard", 10, 180, 60, 12)
    }

    pub fn mma_style() -> Self {
        Self::preset("MMA Style", 10, 300, 60, 5)
    }

    pub fn muay_thai() -> Self {
        Self::preset("Muay Thai", 10, 180, 120, 5)
    }

    pub fn bjj_rolling() -> Self {
        Self::preset("BJJ Rolling", 10, 360, 60, 5)
    }

    pub fn quick_training() -> Self {
        Self::preset("Quick Training", 5, 120, 30, 6)
    }

    /// All built-in presets in display order.
    pub fn presets() -> Vec<Self> {
        vec![
            Self::boxing_standard(),
            Self::mma_style(),
            Self::muay_thai(),
            Self::bjj_rolling(),
            Self::quick_training(),
        ]
    }

    /// Look up a built-in preset by name, ignoring case.
    pub fn from_preset_name(name: &str) -> Result<Self, ScheduleError> {
        Self::presets()
            .into_iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ScheduleError::UnknownPreset(name.to_string()))
    }

    // Presets are literals with rounds and round time above zero.
    fn preset(name: &str, prepare: u32, round: u32, rest: u32, rounds: u32) -> Self {
        Self {
            name: name.to_string(),
            prepare_seconds: prepare,
            round_seconds: round,
            rest_seconds: rest,
            rounds,
        }
    }
}

impl TryFrom<ScheduleSpec> for WorkoutSchedule {
    type Error = ScheduleError;

    fn try_from(spec: ScheduleSpec) -> Result<Self, Self::Error> {
        Self::new(
            spec.name,
            spec.prepare_seconds,
            spec.round_seconds,
            spec.rest_seconds,
            spec.rounds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_rounds() {
        assert_eq!(
            WorkoutSchedule::new("x", 10, 180, 60, 0),
            Err(ScheduleError::ZeroRounds)
        );
    }

    #[test]
    fn rejects_zero_round_time() {
        assert_eq!(
            WorkoutSchedule::new("x", 10, 0, 60, 3),
            Err(ScheduleError::ZeroRoundTime)
        );
    }

    #[test]
    fn accepts_zero_prepare_and_rest() {
        let schedule = WorkoutSchedule::new("x", 0, 60, 0, 1).unwrap();
        assert_eq!(schedule.opening_phase(), Phase::Round);
        assert_eq!(schedule.total_seconds(), 60);
    }

    #[test]
    fn total_seconds_counts_rests_between_rounds_only() {
        let schedule = WorkoutSchedule::new("x", 10, 180, 60, 3).unwrap();
        assert_eq!(schedule.total_seconds(), 10 + 3 * 180 + 2 * 60);
    }

    #[test]
    fn nominal_duration_per_phase() {
        let schedule = WorkoutSchedule::new("x", 5, 120, 30, 6).unwrap();
        assert_eq!(schedule.nominal_duration(Phase::Prepare), 5);
        assert_eq!(schedule.nominal_duration(Phase::Round), 120);
        assert_eq!(schedule.nominal_duration(Phase::Rest), 30);
        assert_eq!(schedule.nominal_duration(Phase::Idle), 0);
        assert_eq!(schedule.nominal_duration(Phase::Finished), 0);
    }

    #[test]
    fn preset_lookup_ignores_case() {
        let preset = WorkoutSchedule::from_preset_name("muay thai").unwrap();
        assert_eq!(preset.name(), "Muay Thai");
        assert_eq!(preset.rest_seconds(), 120);

        assert_eq!(
            WorkoutSchedule::from_preset_name("karate"),
            Err(ScheduleError::UnknownPreset("karate".to_string()))
        );
    }

    #[test]
    fn deserialisation_goes_through_validation() {
        let ok: WorkoutSchedule =
            serde_json::from_str(r#"{"round_seconds": 60, "rounds": 2}"#).unwrap();
        assert_eq!(ok.name(), "Custom");
        assert_eq!(ok.prepare_seconds(), 0);

        let err = serde_json::from_str::<WorkoutSchedule>(r#"{"round_seconds": 60, "rounds": 0}"#);
        assert!(err.is_err());
    }
}

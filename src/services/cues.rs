//! Cue playback for a headless host

use tracing::info;

use crate::timer::{Cue, CueSink};

/// Announces cues in the log; a device build swaps in a real sound/haptic player.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCuePlayer;

impl CueSink for LoggingCuePlayer {
    fn play(&self, cue: Cue) -> Result<(), String> {
        info!(
            "Cue: sound={} haptic={:?} ({:?})",
            cue.sound_name(),
            cue.haptic(),
            cue
        );
        Ok(())
    }
}
